use clap::{Parser, Subcommand};

/// Command-line interface definition for email2printer
#[derive(Parser)]
#[command(
    name = "email2printer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Collect the daily spreadsheet report from a mailbox and mail a printable PDF to a printer",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: <config dir>/email2printer/email2printer.yaml)
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the report attachments in the current window and send the PDF
    Run {
        /// Pretend the run happens at this instant (RFC 3339)
        #[arg(long = "now", value_name = "RFC3339")]
        now: Option<String>,

        /// Also write the PDF to this file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<String>,

        /// Build the PDF but do not send it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// Render local spreadsheet files into one PDF, without any mail access
    Render {
        /// Spreadsheet files, one page-group each, in order
        #[arg(required = true, value_name = "XLSX")]
        inputs: Vec<String>,

        #[arg(long, short = 'o', value_name = "FILE")]
        output: String,

        /// Overwrite the output file if it exists
        #[arg(long, short = 'f')]
        force: bool,

        /// Repeat the first row on continuation pages
        #[arg(long = "repeat-header")]
        repeat_header: bool,
    },

    /// Show the inclusion window for an instant
    Window {
        /// Instant to evaluate (RFC 3339, default: now)
        #[arg(long = "now", value_name = "RFC3339")]
        now: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration or create a template file
    Config {
        #[arg(long = "print", help = "Print the effective configuration (password masked)")]
        print_config: bool,

        #[arg(long = "init", help = "Write a template configuration file")]
        init: bool,
    },
}
