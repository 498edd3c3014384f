//! Unified application error type.
//! Every module (config, core, mail, report, cli) returns AppError so that
//! run-level failures reach `main` unchanged.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing setting: {0} (set it in the config file or the environment)")]
    MissingSetting(&'static str),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Message parse error: {0}")]
    MessageParse(String),

    // ---------------------------
    // Boundary errors
    // ---------------------------
    #[error("Mailbox error: {0}")]
    Mailbox(String),

    #[error("Cannot read spreadsheet '{filename}': {reason}")]
    Spreadsheet { filename: String, reason: String },

    #[error("PDF render error: {0}")]
    Render(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Cannot assemble a document without tables")]
    EmptyDocument,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<imap::Error> for AppError {
    fn from(e: imap::Error) -> Self {
        AppError::Mailbox(e.to_string())
    }
}

impl From<mailparse::MailParseError> for AppError {
    fn from(e: mailparse::MailParseError) -> Self {
        AppError::MessageParse(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
