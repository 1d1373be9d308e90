use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::week::WeekLifecycle;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Close { week } = cmd {
        let mut ctx = LedgerContext::from_config(cfg)?;
        let report = WeekLifecycle::close(&mut ctx, *week)?;

        if report.closed_now == 0 {
            info(format!("Week {} was already closed.", report.week_id));
        } else {
            success(format!(
                "Week {} closed ({} record(s)).",
                report.week_id, report.closed_now
            ));
        }
    }
    Ok(())
}
