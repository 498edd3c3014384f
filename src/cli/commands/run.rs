use crate::Outcome;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{Pipeline, RunOutcome, WindowHours, WindowResult, compute_window};
use crate::errors::AppResult;
use crate::mail::{ImapMailbox, SmtpDispatcher};
use crate::report::grid::XlsxDecoder;
use crate::ui::messages::{info, warning};
use crate::utils::date::resolve_now;
use crate::utils::path::expand_tilde;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<Outcome> {
    let Commands::Run {
        now,
        output,
        dry_run,
    } = cmd
    else {
        return Ok(Outcome::Done);
    };

    let tz = cfg.tz()?;
    let now = resolve_now(now.as_deref(), &tz)?;
    let hours = WindowHours {
        start_hour: cfg.window.start_hour,
        end_hour: cfg.window.end_hour,
    };

    // weekends stop here, before any network access
    let window = match compute_window(&now, hours) {
        WindowResult::Applicable(w) => w,
        WindowResult::NotApplicable(day) => return Ok(finish(RunOutcome::NotApplicable(day))),
    };

    let output = output.as_deref().map(expand_tilde);
    let smtp = if *dry_run {
        if output.is_none() {
            warning("Dry run without --output: the PDF will be discarded");
        }
        None
    } else {
        cfg.printer()?;
        Some(SmtpDispatcher::from_config(cfg)?)
    };

    let decoder = XlsxDecoder;
    let mut pipeline = Pipeline::new(cfg, &decoder);
    if let Some(d) = smtp.as_ref() {
        pipeline = pipeline.with_dispatcher(d);
    }
    if let Some(path) = output.as_deref() {
        pipeline = pipeline.with_output(path);
    }

    let mut mailbox = ImapMailbox::connect(cfg)?;
    let result = pipeline.run(&mut mailbox, &window, Utc::now());
    mailbox.logout();

    Ok(finish(result?))
}

fn finish(outcome: RunOutcome) -> Outcome {
    match outcome {
        RunOutcome::Delivered {
            dispatched: false, ..
        } => {
            info("Dry run: nothing was sent");
            Outcome::Done
        }
        RunOutcome::Delivered { .. } => Outcome::Done,
        RunOutcome::NothingToReport { examined } => {
            info(format!("Nothing to print ({examined} message(s) examined)"));
            Outcome::NothingToDo
        }
        RunOutcome::NotApplicable(day) => {
            info(format!("{day}: no report is collected on weekends"));
            Outcome::NothingToDo
        }
    }
}
