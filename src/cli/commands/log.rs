use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print, filter } = cmd
        && (*print || filter.is_some())
    {
        let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
        LogLogic::print_log(&pool.conn, filter.as_deref())?;
    }

    Ok(())
}
