use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

/// Overrides the configuration directory (handy for tests and containers).
pub const HOME_ENV: &str = "FLEETLEDGER_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_tenants_dir")]
    pub tenants_dir: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default = "default_oil_interval")]
    pub default_oil_interval_km: i64,
    #[serde(default = "default_belt_interval")]
    pub default_belt_interval_km: i64,
    #[serde(default = "default_weekly_allowance")]
    pub default_weekly_km_allowance: i64,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_tenants_dir() -> String {
    Config::config_dir()
        .join("tenants")
        .to_string_lossy()
        .to_string()
}
fn default_operator() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "operator".to_string())
}
fn default_oil_interval() -> i64 {
    10_000
}
fn default_belt_interval() -> i64 {
    60_000
}
fn default_weekly_allowance() -> i64 {
    1_500
}
fn default_busy_timeout() -> u64 {
    crate::db::pool::DEFAULT_BUSY_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            tenants_dir: default_tenants_dir(),
            operator: default_operator(),
            default_oil_interval_km: default_oil_interval(),
            default_belt_interval_km: default_belt_interval(),
            default_weekly_km_allowance: default_weekly_allowance(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

impl Config {
    /// `$FLEETLEDGER_HOME`, else `%APPDATA%\fleetledger` on Windows and
    /// `~/.fleetledger` elsewhere.
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(HOME_ENV)
            && !dir.trim().is_empty()
        {
            return PathBuf::from(dir);
        }

        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fleetledger")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".fleetledger")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("fleetledger.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("fleetledger.sqlite")
    }

    /// Load the configuration file, or defaults when there is none yet.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Database file of a named tenant inside `tenants_dir`.
    pub fn tenant_database(&self, tenant: &str) -> AppResult<String> {
        let valid = !tenant.is_empty()
            && tenant
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::InvalidInput(format!(
                "invalid tenant name '{}' (letters, digits, '-' and '_' only)",
                tenant
            )));
        }

        Ok(Path::new(&self.tenants_dir)
            .join(format!("{}.sqlite", tenant))
            .to_string_lossy()
            .to_string())
    }

    /// Create the config directory, write the config file (unless
    /// `is_test`) and make sure the database's folder exists.
    /// Returns the database path that was set up.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let mut config = if Self::config_file().exists() {
            Self::load()?
        } else {
            Self::default()
        };

        if let Some(name) = custom_db {
            let p = Path::new(name);
            let db_path = if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            };
            config.database = db_path.to_string_lossy().to_string();
        }

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
            fs::create_dir_all(&config.tenants_dir)?;
        }

        if let Some(parent) = Path::new(&config.database).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config.database)
    }
}
