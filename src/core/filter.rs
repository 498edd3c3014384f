//! Message selection and attachment extraction.

use crate::config::Config;
use crate::core::boundary::CandidateSource;
use crate::core::message::{AttachmentPayload, CandidateMessage, ParsedMessage};
use crate::core::window::TimeWindow;
use log::{debug, warn};

/// Matching rule applied to every candidate.
#[derive(Debug, Clone, Copy)]
pub struct MessageCriteria<'a> {
    /// Must appear verbatim (case-sensitive) somewhere in the body.
    pub phrase: &'a str,
    /// Recognized spreadsheet extension, e.g. `.xlsx`.
    pub attachment_ext: &'a str,
    /// Required sender address; `None` accepts any sender.
    pub sender: Option<&'a str>,
}

impl<'a> MessageCriteria<'a> {
    pub fn from_config(cfg: &'a Config) -> Self {
        Self {
            phrase: &cfg.filter.phrase,
            attachment_ext: &cfg.filter.attachment_ext,
            sender: cfg.filter.sender.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Included,
    NoTimestamp,
    OutsideWindow,
    WrongSender,
    PhraseMissing,
}

/// Decide whether a parsed message qualifies.
pub fn evaluate(msg: &ParsedMessage, window: &TimeWindow, criteria: &MessageCriteria) -> Verdict {
    let Some(ts) = msg.precise_timestamp.as_ref() else {
        return Verdict::NoTimestamp;
    };

    if !window.contains(ts) {
        return Verdict::OutsideWindow;
    }

    if let Some(expected) = criteria.sender
        && !msg.sender.eq_ignore_ascii_case(expected.trim())
    {
        return Verdict::WrongSender;
    }

    if !msg.body_text.contains(criteria.phrase) {
        return Verdict::PhraseMissing;
    }

    Verdict::Included
}

/// Case-insensitive extension check on a declared filename.
pub fn has_extension(filename: &str, ext: &str) -> bool {
    filename
        .trim()
        .to_ascii_lowercase()
        .ends_with(&ext.to_ascii_lowercase())
}

/// Spreadsheet attachments of a qualifying message, in part order.
pub fn select_attachments(msg: ParsedMessage, criteria: &MessageCriteria) -> Vec<AttachmentPayload> {
    msg.attachments
        .into_iter()
        .filter(|a| has_extension(&a.filename, criteria.attachment_ext))
        .collect()
}

/// Result of one pass over the candidates.
#[derive(Debug, Default)]
pub struct FilterReport {
    pub payloads: Vec<AttachmentPayload>,
    pub examined: usize,
    pub skipped: usize,
    pub matched: usize,
}

impl FilterReport {
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// Server-side receive date of a candidate, for diagnostics.
pub fn received_label(candidate: &CandidateMessage) -> String {
    candidate
        .received_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Walk every candidate, keep the spreadsheet attachments of the qualifying
/// ones. Per-message failures are logged and skipped, never returned.
pub fn collect_attachments(
    source: &mut dyn CandidateSource,
    candidates: &[CandidateMessage],
    window: &TimeWindow,
    criteria: &MessageCriteria,
) -> FilterReport {
    let mut report = FilterReport::default();

    for candidate in candidates {
        report.examined += 1;

        let raw = match source.materialize(candidate) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("UID {}: cannot fetch message: {e}", candidate.uid);
                report.skipped += 1;
                continue;
            }
        };

        let msg = match ParsedMessage::parse(&raw) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("UID {}: {e}", candidate.uid);
                report.skipped += 1;
                continue;
            }
        };

        match evaluate(&msg, window, criteria) {
            Verdict::Included => {}
            Verdict::NoTimestamp => {
                warn!(
                    "UID {}: missing or unparseable Date header (received {})",
                    candidate.uid,
                    received_label(candidate)
                );
                report.skipped += 1;
                continue;
            }
            other => {
                debug!(
                    "UID {}: excluded ({other:?}, received {})",
                    candidate.uid,
                    received_label(candidate)
                );
                continue;
            }
        }

        report.matched += 1;
        let found = select_attachments(msg, criteria);
        debug!(
            "UID {}: qualifying message with {} spreadsheet attachment(s)",
            candidate.uid,
            found.len()
        );
        report.payloads.extend(found);
    }

    report
}
