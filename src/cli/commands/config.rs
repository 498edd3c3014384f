use crate::Outcome;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, path: Option<&str>) -> AppResult<Outcome> {
    if let Commands::Config { print_config, init } = cmd {
        let path = path.map(expand_tilde).unwrap_or_else(Config::config_file);

        if *init {
            if Config::write_template(&path)? {
                success(format!("Config file: {}", path.display()));
            } else {
                info(format!("Config file already exists: {}", path.display()));
            }
        }

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", cfg.redacted().to_yaml()?);
        }
    }

    Ok(Outcome::Done)
}
