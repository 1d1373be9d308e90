use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with `--test`), then
/// opens the database and applies every pending migration.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let db_path = match (&cli.db, &cli.tenant) {
        (Some(custom), _) => Config::init_all(Some(custom), cli.test)?,
        (None, Some(_)) => {
            Config::init_all(None, cli.test)?;
            std::fs::create_dir_all(&cfg.tenants_dir)?;
            cfg.database.clone()
        }
        (None, None) => Config::init_all(None, cli.test)?,
    };

    println!("⚙️  Initializing fleetledger…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path);

    let pool = DbPool::with_timeout(&db_path, cfg.busy_timeout_ms)?;
    init_db(&pool.conn)?;

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success(format!("Database initialized at {}", db_path));
    Ok(())
}
