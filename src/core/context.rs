//! Explicit per-call context: the tenant connection, who is acting, and the
//! defaults used when a vehicle gets its first maintenance config.

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::maintenance_config::VehicleMaintenanceConfig;
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceDefaults {
    pub oil_interval_km: i64,
    pub belt_interval_km: i64,
    pub weekly_km_allowance: i64,
}

impl Default for MaintenanceDefaults {
    fn default() -> Self {
        Self {
            oil_interval_km: 10_000,
            belt_interval_km: 60_000,
            weekly_km_allowance: 1_500,
        }
    }
}

impl MaintenanceDefaults {
    /// Fresh config for a vehicle that never had one: no changes recorded yet.
    pub fn config_for(&self, vehicle_id: i64) -> VehicleMaintenanceConfig {
        VehicleMaintenanceConfig {
            vehicle_id,
            oil_interval_km: self.oil_interval_km,
            last_oil_change_km: 0,
            has_belt: false,
            belt_interval_km: self.belt_interval_km,
            last_belt_change_km: 0,
            weekly_km_allowance: self.weekly_km_allowance,
            updated_at: String::new(),
        }
    }
}

pub struct LedgerContext {
    pub pool: DbPool,
    pub operator: String,
    pub defaults: MaintenanceDefaults,
}

impl LedgerContext {
    /// Open (and migrate) a tenant database.
    pub fn open(db_path: &str, operator: &str) -> AppResult<Self> {
        let pool = DbPool::new(db_path)?;
        init_db(&pool.conn)?;
        Ok(Self {
            pool,
            operator: operator.to_string(),
            defaults: MaintenanceDefaults::default(),
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
        init_db(&pool.conn)?;
        Ok(Self {
            pool,
            operator: cfg.operator.clone(),
            defaults: MaintenanceDefaults {
                oil_interval_km: cfg.default_oil_interval_km,
                belt_interval_km: cfg.default_belt_interval_km,
                weekly_km_allowance: cfg.default_weekly_km_allowance,
            },
        })
    }

    /// Timestamp format used by every ledger column (ISO 8601, local).
    pub fn now() -> String {
        Local::now().to_rfc3339()
    }
}
