use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::query::WeekQuery;
use crate::core::sync::SyncLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { week, next } = cmd {
        let mut ctx = LedgerContext::from_config(cfg)?;

        let week_id = match (week, next) {
            (Some(w), _) => *w,
            (None, _) => match WeekQuery::next_to_sync(&ctx)? {
                Some(w) => w.id,
                None => {
                    info("Every grid week is already synced.");
                    return Ok(());
                }
            },
        };

        let report = SyncLogic::sync(&mut ctx, week_id)?;
        success(format!(
            "Week {} synced: {} created, {} reassigned, {} unchanged",
            report.week_id, report.created, report.reassigned, report.unchanged
        ));
        if report.skipped > 0 {
            warning(format!(
                "{} vehicle(s) not added: week {} is closed",
                report.skipped, report.week_id
            ));
        }
    }
    Ok(())
}
