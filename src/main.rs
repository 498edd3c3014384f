//! email2printer main entrypoint.

use email2printer::run;
use email2printer::ui::messages::error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            error(format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
