//! Path utilities: expand ~ and guard output files.

use crate::errors::{AppError, AppResult};
use std::io;
use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Refuse to overwrite an existing file unless `force` is set.
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    Err(AppError::from(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} already exists (use --force to overwrite)", path.display()),
    )))
}
