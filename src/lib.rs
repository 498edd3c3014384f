//! email2printer library root.
//! Exposes the CLI parser, the run pipeline and its building blocks.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod mail;
pub mod report;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::PathBuf;

/// How a successful command ended; drives the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Weekend or no qualifying report: not a failure.
    NothingToDo,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Done => 0,
            Outcome::NothingToDo => 3,
        }
    }
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<Outcome> {
    match &cli.command {
        Commands::Run { .. } => cli::commands::run::handle(&cli.command, cfg),
        Commands::Render { .. } => cli::commands::render::handle(&cli.command, cfg),
        Commands::Window { .. } => cli::commands::window::handle(&cli.command, cfg),
        Commands::Config { .. } => {
            cli::commands::config::handle(&cli.command, cfg, cli.config.as_deref())
        }
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<Outcome> {
    let cli = Cli::parse();

    // `config --init` must work before the file exists
    let config_path = cli.config.as_deref().map(utils::path::expand_tilde);
    let cfg = match (&cli.command, config_path.as_ref()) {
        (Commands::Config { init: true, .. }, Some(p)) if !p.exists() => Config::load(None)?,
        (_, p) => Config::load(p.map(PathBuf::as_path))?,
    };

    dispatch(&cli, &cfg)
}
