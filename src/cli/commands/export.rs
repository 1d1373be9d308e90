use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
        ExportLogic::export(&pool.conn, *format, file, range.as_deref(), *force)?;
    }
    Ok(())
}
