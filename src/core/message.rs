use crate::errors::AppResult;
use crate::mail::decoders::{decode_mime_words, sender_address};
use chrono::{DateTime, FixedOffset};
use log::warn;
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};

/// Handle returned by the coarse fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMessage {
    pub uid: u32,
    /// Date-only timestamp from the server, when it reported one.
    pub received_on: Option<chrono::NaiveDate>,
}

impl CandidateMessage {
    pub fn new(uid: u32) -> Self {
        Self {
            uid,
            received_on: None,
        }
    }
}

/// Attachment bytes plus the declared filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What the filter needs to know about one message.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub precise_timestamp: Option<DateTime<FixedOffset>>,
    pub sender: String,
    pub body_text: String,
    /// Every part marked as an attachment that declares a filename.
    pub attachments: Vec<AttachmentPayload>,
}

impl ParsedMessage {
    /// Parse a raw RFC 822 message.
    ///
    /// Only a structurally broken message is an error. A missing date, an
    /// undecodable body or a broken attachment encoding degrade to
    /// `None` / empty / skipped so the filter can decide.
    pub fn parse(raw: &[u8]) -> AppResult<Self> {
        let mail = mailparse::parse_mail(raw)?;

        let precise_timestamp = mail
            .headers
            .get_first_value("Date")
            .and_then(|d| parse_date_header(&d));

        let sender = mail
            .headers
            .get_first_value("From")
            .map(|f| sender_address(&f))
            .unwrap_or_default();

        let body_text = match find_plain_text(&mail) {
            Some(part) => part.get_body().unwrap_or_else(|e| {
                warn!("undecodable text/plain part: {e}");
                String::new()
            }),
            None => String::new(),
        };

        let mut attachments = Vec::new();
        for part in mail.parts() {
            let disposition = part.get_content_disposition();
            if disposition.disposition != DispositionType::Attachment {
                continue;
            }

            let Some(filename) = disposition
                .params
                .get("filename")
                .or_else(|| part.ctype.params.get("name"))
                .map(|n| decode_mime_words(n))
            else {
                continue;
            };

            match part.get_body_raw() {
                Ok(bytes) => attachments.push(AttachmentPayload { filename, bytes }),
                Err(e) => warn!("skipping attachment '{filename}': {e}"),
            }
        }

        Ok(Self {
            precise_timestamp,
            sender,
            body_text,
            attachments,
        })
    }
}

/// RFC 2822 first, then mailparse's lenient parser for the odd formats that
/// real mailers produce.
pub fn parse_date_header(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Some(t);
    }

    let epoch = mailparse::dateparse(value).ok()?;
    DateTime::from_timestamp(epoch, 0).map(|t| t.fixed_offset())
}

/// Depth-first search for the first inline `text/plain` part.
fn find_plain_text<'a>(part: &'a ParsedMail<'a>) -> Option<&'a ParsedMail<'a>> {
    let is_attachment =
        part.get_content_disposition().disposition == DispositionType::Attachment;

    if !is_attachment && part.ctype.mimetype.eq_ignore_ascii_case("text/plain") {
        return Some(part);
    }

    part.subparts.iter().find_map(find_plain_text)
}
