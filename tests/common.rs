#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use email2printer::core::boundary::{CandidateSource, Dispatcher};
use email2printer::core::message::CandidateMessage;
use email2printer::errors::{AppError, AppResult};
use rust_xlsxwriter::Workbook;
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const TZ: Tz = chrono_tz::America::New_York;

pub fn e2p() -> Command {
    let mut cmd = cargo_bin_cmd!("email2printer");
    for key in [
        "GMAIL_USER",
        "GMAIL_PASSWORD",
        "PRINTER_EMAIL",
        "REPORT_PHRASE",
        "REPORT_ATTACHMENT_EXT",
        "REPORT_TIMEZONE",
        "REPORT_SENDER",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// Parse an RFC 3339 instant into the test timezone.
pub fn at(s: &str) -> DateTime<Tz> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339")
        .with_timezone(&TZ)
}

/// Unique temp file path, removed if it already exists
pub fn temp_out(name: &str, ext: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_email2printer.{}", name, ext));
    fs::remove_file(&path).ok();
    path
}

/// Build an `.xlsx` workbook in memory with one sheet holding `rows`.
pub fn xlsx_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet
                .write_string(r as u32, c as u16, *value)
                .expect("write cell");
        }
    }
    workbook.save_to_buffer().expect("xlsx buffer")
}

/// Minimal RFC 822 message builder for filter tests.
#[derive(Clone)]
pub struct MailFixture {
    date: Option<String>,
    from: String,
    body: String,
    html: Option<String>,
    with_plain: bool,
    attachments: Vec<(String, Vec<u8>)>,
}

impl MailFixture {
    pub fn new(date: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            from: "Reports <reports@example.com>".to_string(),
            body: "Hello,\r\nattached is the Daily Lead Report for today.\r\n".to_string(),
            html: None,
            with_plain: true,
            attachments: Vec::new(),
        }
    }

    pub fn without_date(mut self) -> Self {
        self.date = None;
        self
    }

    pub fn from(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Send the body as `multipart/alternative`: the plain part plus `html`.
    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    /// Replace the plain part with a single `text/html` part.
    pub fn html_only(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self.with_plain = false;
        self
    }

    pub fn attach(mut self, filename: &str, bytes: Vec<u8>) -> Self {
        self.attachments.push((filename.to_string(), bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let boundary = "=_fixture_boundary_42";
        let mut out = String::new();

        out.push_str(&format!("From: {}\r\n", self.from));
        out.push_str("To: inbox@example.com\r\n");
        out.push_str("Subject: report\r\n");
        if let Some(d) = &self.date {
            out.push_str(&format!("Date: {d}\r\n"));
        }
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str(&format!(
            "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\r\n"
        ));

        out.push_str(&format!("--{boundary}\r\n"));
        match &self.html {
            None => text_part(&mut out, "text/plain", &self.body),
            Some(html) if !self.with_plain => text_part(&mut out, "text/html", html),
            Some(html) => {
                let alt = "=_fixture_alt_7";
                out.push_str(&format!(
                    "Content-Type: multipart/alternative; boundary=\"{alt}\"\r\n\r\n"
                ));
                out.push_str(&format!("--{alt}\r\n"));
                text_part(&mut out, "text/plain", &self.body);
                out.push_str(&format!("--{alt}\r\n"));
                text_part(&mut out, "text/html", html);
                out.push_str(&format!("--{alt}--\r\n"));
            }
        }

        for (name, bytes) in &self.attachments {
            out.push_str(&format!("--{boundary}\r\n"));
            out.push_str(&format!(
                "Content-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet; name=\"{name}\"\r\n"
            ));
            out.push_str(&format!(
                "Content-Disposition: attachment; filename=\"{name}\"\r\n"
            ));
            out.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
            let encoded = general_purpose::STANDARD.encode(bytes);
            for chunk in encoded.as_bytes().chunks(76) {
                out.push_str(std::str::from_utf8(chunk).expect("ascii"));
                out.push_str("\r\n");
            }
        }

        out.push_str(&format!("--{boundary}--\r\n"));
        out.into_bytes()
    }
}

fn text_part(out: &mut String, mime: &str, body: &str) {
    out.push_str(&format!("Content-Type: {mime}; charset=\"utf-8\"\r\n"));
    out.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
    out.push_str(body);
    out.push_str("\r\n");
}

/// In-memory mailbox. `None` bodies simulate a failed retrieval.
#[derive(Default)]
pub struct FakeMailbox {
    pub messages: Vec<(CandidateMessage, Option<Vec<u8>>)>,
    pub fetched_since: Option<NaiveDate>,
}

impl FakeMailbox {
    pub fn with(mut self, raw: Vec<u8>) -> Self {
        let uid = self.messages.len() as u32 + 1;
        self.messages.push((CandidateMessage::new(uid), Some(raw)));
        self
    }

    pub fn with_broken(mut self) -> Self {
        let uid = self.messages.len() as u32 + 1;
        self.messages.push((CandidateMessage::new(uid), None));
        self
    }
}

impl CandidateSource for FakeMailbox {
    fn fetch_since(&mut self, since: NaiveDate) -> AppResult<Vec<CandidateMessage>> {
        self.fetched_since = Some(since);
        Ok(self.messages.iter().map(|(c, _)| c.clone()).collect())
    }

    fn materialize(&mut self, candidate: &CandidateMessage) -> AppResult<Vec<u8>> {
        self.messages
            .iter()
            .find(|(c, _)| c.uid == candidate.uid)
            .and_then(|(_, raw)| raw.clone())
            .ok_or_else(|| AppError::Mailbox(format!("UID {} vanished", candidate.uid)))
    }
}

/// Dispatcher that records what it was asked to send.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: RefCell<Vec<(Vec<u8>, String, String)>>,
    pub fail: bool,
}

impl Dispatcher for RecordingDispatcher {
    fn send(&self, document: &[u8], destination: &str, subject: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Dispatch("relay refused the message".into()));
        }
        self.sent
            .borrow_mut()
            .push((document.to_vec(), destination.to_string(), subject.to_string()));
        Ok(())
    }
}

/// Number of page objects in a PDF byte stream.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
}
