use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Current instant in `tz`, or the `--now` override (RFC 3339).
pub fn resolve_now(now: Option<&str>, tz: &Tz) -> AppResult<DateTime<Tz>> {
    match now {
        Some(s) => parse_instant(s, tz),
        None => Ok(Utc::now().with_timezone(tz)),
    }
}

/// Parse an RFC 3339 instant and express it in `tz`.
pub fn parse_instant(s: &str, tz: &Tz) -> AppResult<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(tz))
        .map_err(|e| AppError::InvalidInstant(format!("{s}: {e}")))
}
