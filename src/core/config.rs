use crate::config::Config;
use crate::config::migrate::{check_missing_keys, migrate_missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        println!("{}", content);
        Ok(())
    }

    /// Report keys the file is missing. Returns how many.
    pub fn check(path: &Path) -> AppResult<usize> {
        let missing = check_missing_keys(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(&format!("Missing keys: {}", missing.join(", ")));
            info("Run `fleetledger config --migrate` to add them with default values.");
        }
        Ok(missing.len())
    }

    pub fn migrate(path: &Path) -> AppResult<()> {
        let added = migrate_missing_keys(path)?;
        if added.is_empty() {
            info("Nothing to migrate.");
        } else {
            success(&format!("Added keys: {}", added.join(", ")));
        }
        // the migrated file must still parse
        Config::load_from(path)?;
        Ok(())
    }

    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let ed = editor
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| "nano".into());

        Command::new(ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }
}
