use crate::Outcome;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::window::WindowView;
use crate::core::{WindowHours, WindowResult, compute_window};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::utils::date::resolve_now;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<Outcome> {
    let Commands::Window { now, json } = cmd else {
        return Ok(Outcome::Done);
    };

    let tz = cfg.tz()?;
    let now = resolve_now(now.as_deref(), &tz)?;
    let result = compute_window(
        &now,
        WindowHours {
            start_hour: cfg.window.start_hour,
            end_hour: cfg.window.end_hour,
        },
    );

    if *json {
        let view = WindowView::new(&now, &result);
        let text = serde_json::to_string_pretty(&view).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{text}");
    } else {
        match &result {
            WindowResult::Applicable(w) => {
                info(format!("Window ({}): {w}", cfg.timezone));
            }
            WindowResult::NotApplicable(day) => {
                info(format!("{day}: not applicable (weekend)"));
            }
        }
    }

    Ok(match result {
        WindowResult::Applicable(_) => Outcome::Done,
        WindowResult::NotApplicable(_) => Outcome::NothingToDo,
    })
}
