use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::week::WeekLifecycle;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Delete { week, yes } = cmd {
        if !*yes {
            return Err(AppError::InvalidInput(format!(
                "deleting week {} removes its records, readings and service events; re-run with --yes",
                week
            )));
        }

        let mut ctx = LedgerContext::from_config(cfg)?;
        let report = WeekLifecycle::delete(&mut ctx, *week)?;
        success(format!(
            "Week {} deleted: {} record(s), {} reading(s), {} service event(s).",
            report.week_id, report.records, report.readings, report.service_events
        ));
    }
    Ok(())
}
