use crate::core::context::LedgerContext;
use crate::db::configs::MaintenanceConfigRepo;
use crate::db::grid::VehicleRepo;
use crate::db::log::ttlog;
use crate::db::repository::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::maintenance_config::{ConfigPatch, VehicleMaintenanceConfig};

pub struct MaintenanceLogic;

impl MaintenanceLogic {
    /// Create or patch a vehicle's maintenance config.
    ///
    /// A vehicle without a config starts from the context defaults.
    pub fn update(
        ctx: &mut LedgerContext,
        vehicle_id: i64,
        patch: &ConfigPatch,
    ) -> AppResult<VehicleMaintenanceConfig> {
        if patch.is_empty() {
            return Err(AppError::InvalidInput(
                "nothing to update: pass at least one maintenance field".into(),
            ));
        }

        let defaults = ctx.defaults;
        let tx = ctx.pool.conn.transaction()?;
        let stored = {
            VehicleRepo::new(&tx).require(&vehicle_id)?;

            let configs = MaintenanceConfigRepo::new(&tx);
            let mut cfg = configs
                .get(&vehicle_id)?
                .unwrap_or_else(|| defaults.config_for(vehicle_id));
            cfg.apply(patch);
            cfg.validate()?;

            let stored = configs.upsert(&cfg)?;
            ttlog(
                &tx,
                "maintenance",
                &format!("vehicle {}", vehicle_id),
                &format!(
                    "oil {}/{} belt {}{}/{} allowance {} by {}",
                    stored.last_oil_change_km,
                    stored.oil_interval_km,
                    if stored.has_belt { "" } else { "(none) " },
                    stored.last_belt_change_km,
                    stored.belt_interval_km,
                    stored.weekly_km_allowance,
                    ctx.operator
                ),
            )?;
            stored
        };
        tx.commit()?;
        Ok(stored)
    }

    pub fn get(ctx: &LedgerContext, vehicle_id: i64) -> AppResult<Option<VehicleMaintenanceConfig>> {
        MaintenanceConfigRepo::new(&ctx.pool.conn).get(&vehicle_id)
    }
}
