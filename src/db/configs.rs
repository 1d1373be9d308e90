use crate::db::repository::Repository;
use crate::errors::AppResult;
use crate::models::maintenance_config::VehicleMaintenanceConfig;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;

pub struct MaintenanceConfigRepo<'c> {
    conn: &'c Connection,
}

impl<'c> MaintenanceConfigRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// All configs keyed by vehicle, for grid projections.
    pub fn all_by_vehicle(&self) -> AppResult<HashMap<i64, VehicleMaintenanceConfig>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT vehicle_id, oil_interval_km, last_oil_change_km, has_belt,
                    belt_interval_km, last_belt_change_km, weekly_km_allowance, updated_at
             FROM maintenance_configs",
        )?;
        let rows = stmt.query_map([], map_row)?;

        let mut out = HashMap::new();
        for r in rows {
            let cfg = r?;
            out.insert(cfg.vehicle_id, cfg);
        }
        Ok(out)
    }
}

impl Repository for MaintenanceConfigRepo<'_> {
    type Key = i64;
    type Entity = VehicleMaintenanceConfig;

    fn get(&self, vehicle_id: &i64) -> AppResult<Option<VehicleMaintenanceConfig>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT vehicle_id, oil_interval_km, last_oil_change_km, has_belt,
                    belt_interval_km, last_belt_change_km, weekly_km_allowance, updated_at
             FROM maintenance_configs
             WHERE vehicle_id = ?1",
        )?;
        Ok(stmt.query_row([vehicle_id], map_row).optional()?)
    }

    fn upsert(&self, cfg: &VehicleMaintenanceConfig) -> AppResult<VehicleMaintenanceConfig> {
        let now = chrono::Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO maintenance_configs
                (vehicle_id, oil_interval_km, last_oil_change_km, has_belt,
                 belt_interval_km, last_belt_change_km, weekly_km_allowance, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(vehicle_id) DO UPDATE SET
                oil_interval_km = excluded.oil_interval_km,
                last_oil_change_km = excluded.last_oil_change_km,
                has_belt = excluded.has_belt,
                belt_interval_km = excluded.belt_interval_km,
                last_belt_change_km = excluded.last_belt_change_km,
                weekly_km_allowance = excluded.weekly_km_allowance,
                updated_at = excluded.updated_at",
            params![
                cfg.vehicle_id,
                cfg.oil_interval_km,
                cfg.last_oil_change_km,
                cfg.has_belt,
                cfg.belt_interval_km,
                cfg.last_belt_change_km,
                cfg.weekly_km_allowance,
                now,
            ],
        )?;

        let mut stored = cfg.clone();
        stored.updated_at = now;
        Ok(stored)
    }

    fn delete(&self, vehicle_id: &i64) -> AppResult<bool> {
        let n = self.conn.execute(
            "DELETE FROM maintenance_configs WHERE vehicle_id = ?1",
            [vehicle_id],
        )?;
        Ok(n > 0)
    }

    fn entity_name(&self) -> &'static str {
        "maintenance config for vehicle"
    }
}

fn map_row(row: &Row) -> rusqlite::Result<VehicleMaintenanceConfig> {
    Ok(VehicleMaintenanceConfig {
        vehicle_id: row.get(0)?,
        oil_interval_km: row.get(1)?,
        last_oil_change_km: row.get(2)?,
        has_belt: row.get(3)?,
        belt_interval_km: row.get(4)?,
        last_belt_change_km: row.get(5)?,
        weekly_km_allowance: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
