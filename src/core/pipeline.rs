use crate::config::Config;
use crate::core::boundary::{CandidateSource, Dispatcher, SpreadsheetDecoder};
use crate::core::filter::{MessageCriteria, collect_attachments};
use crate::core::window::TimeWindow;
use crate::errors::AppResult;
use crate::report::{PageGeometry, RenderOptions, build_pdf};
use crate::ui::messages::{info, success, warning};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// How a run ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Weekend: no window, no I/O.
    NotApplicable(chrono::Weekday),
    /// The window holds no qualifying spreadsheet attachment.
    NothingToReport { examined: usize },
    /// A document was produced (and sent unless dispatch was disabled).
    Delivered {
        tables: usize,
        pages: usize,
        bytes: usize,
        dispatched: bool,
    },
}

impl RunOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RunOutcome::Delivered { .. })
    }
}

/// Subject line of the outbound message.
pub fn subject_for(sent_at: DateTime<Utc>) -> String {
    format!("Daily Report {}", sent_at.format("%Y-%m-%d %H:%M:%S UTC"))
}

/// Everything after the window: fetch, filter, build, deliver.
pub struct Pipeline<'a> {
    pub cfg: &'a Config,
    pub decoder: &'a dyn SpreadsheetDecoder,
    /// `None` skips dispatch (dry run).
    pub dispatcher: Option<&'a dyn Dispatcher>,
    /// Also write the PDF here.
    pub output: Option<&'a Path>,
    pub geometry: PageGeometry,
}

impl<'a> Pipeline<'a> {
    pub fn new(cfg: &'a Config, decoder: &'a dyn SpreadsheetDecoder) -> Self {
        Self {
            cfg,
            decoder,
            dispatcher: None,
            output: None,
            geometry: PageGeometry::default(),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: &'a dyn Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_output(mut self, output: &'a Path) -> Self {
        self.output = Some(output);
        self
    }

    pub fn run(
        &self,
        source: &mut dyn CandidateSource,
        window: &TimeWindow,
        sent_at: DateTime<Utc>,
    ) -> AppResult<RunOutcome> {
        info(format!("Window: {window}"));

        let candidates = source.fetch_since(window.since_date())?;
        info(format!(
            "{} candidate message(s) since {}",
            candidates.len(),
            window.since_date()
        ));

        let criteria = MessageCriteria::from_config(self.cfg);
        let report = collect_attachments(source, &candidates, window, &criteria);

        if report.skipped > 0 {
            warning(format!("{} message(s) skipped as unreadable", report.skipped));
        }

        if report.is_empty() {
            info(format!(
                "No qualifying {} attachment in {} message(s)",
                self.cfg.filter.attachment_ext, report.examined
            ));
            return Ok(RunOutcome::NothingToReport {
                examined: report.examined,
            });
        }

        info(format!(
            "{} attachment(s) from {} qualifying message(s); building PDF",
            report.payloads.len(),
            report.matched
        ));

        let opts = RenderOptions {
            repeat_header: self.cfg.layout.repeat_header,
        };
        let pdf = build_pdf(&report.payloads, self.decoder, &self.geometry, &opts)?;
        success(format!("PDF generated: {} page(s)", pdf.pages));

        if let Some(path) = self.output {
            fs::write(path, &pdf.bytes)?;
            success(format!("PDF written to {}", path.display()));
        }

        let dispatched = match self.dispatcher {
            Some(dispatcher) => {
                let destination = self.cfg.printer()?;
                info(format!("Sending report to {destination}"));
                dispatcher.send(&pdf.bytes, destination, &subject_for(sent_at))?;
                success("Email sent successfully.");
                true
            }
            None => false,
        };

        Ok(RunOutcome::Delivered {
            tables: report.payloads.len(),
            pages: pdf.pages,
            bytes: pdf.bytes.len(),
            dispatched,
        })
    }
}
