use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
        let written = BackupLogic::backup(&pool.conn, &cfg.database, file, *compress, *force)?;
        success(format!("Backup created: {}", written.display()));
    }

    Ok(())
}
