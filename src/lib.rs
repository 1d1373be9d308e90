//! Fleet maintenance control ledger.
//!
//! Weekly odometer control per vehicle, derived maintenance alerts, and the
//! shop-visit lifecycle, stored in one SQLite database per tenant.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Import { .. } => cli::commands::import::handle(&cli.command, cfg),
        Commands::Weeks { .. } => cli::commands::weeks::handle(&cli.command, cfg),
        Commands::Sync { .. } => cli::commands::sync::handle(&cli.command, cfg),
        Commands::Grid { .. } => cli::commands::grid::handle(&cli.command, cfg),
        Commands::Close { .. } => cli::commands::close::handle(&cli.command, cfg),
        Commands::Delete { .. } => cli::commands::delete::handle(&cli.command, cfg),
        Commands::Maint { .. } => cli::commands::maint::handle(&cli.command, cfg),
        Commands::Km { .. } => cli::commands::km::handle(&cli.command, cfg),
        Commands::Service { .. } => cli::commands::service::handle(&cli.command, cfg),
        Commands::History { .. } => cli::commands::history::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Apply the global flags on top of the loaded configuration.
pub fn resolve_config(cli: &Cli, mut cfg: Config) -> AppResult<Config> {
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    } else if let Some(tenant) = &cli.tenant {
        cfg.database = cfg.tenant_database(tenant)?;
    }

    if let Some(op) = &cli.operator {
        cfg.operator = op.clone();
    }

    Ok(cfg)
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(&cli, Config::load()?)?;
    dispatch(&cli, &cfg)
}
