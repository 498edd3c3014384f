//! Seams to the external collaborators.

use crate::core::message::{AttachmentPayload, CandidateMessage};
use crate::errors::AppResult;
use crate::report::grid::Grid;
use chrono::NaiveDate;

/// Mailbox access: coarse listing plus per-message retrieval.
pub trait CandidateSource {
    /// Every message whose date-only timestamp is on or after `since`.
    /// No ordering or time-of-day filtering is promised.
    fn fetch_since(&mut self, since: NaiveDate) -> AppResult<Vec<CandidateMessage>>;

    /// Raw RFC 822 bytes of one candidate.
    fn materialize(&mut self, candidate: &CandidateMessage) -> AppResult<Vec<u8>>;
}

/// Turns an attachment into a rectangular grid of text cells.
pub trait SpreadsheetDecoder {
    fn decode(&self, payload: &AttachmentPayload) -> AppResult<Grid>;
}

/// Outbound transport for the finished document.
pub trait Dispatcher {
    fn send(&self, document: &[u8], destination: &str, subject: &str) -> AppResult<()>;
}
