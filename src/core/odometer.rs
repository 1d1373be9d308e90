use crate::core::alerts::MaintenanceAlertEngine;
use crate::core::context::LedgerContext;
use crate::core::guards::{ensure_open, expect_version};
use crate::db::configs::MaintenanceConfigRepo;
use crate::db::km_history::KmHistoryRepo;
use crate::db::log::ttlog;
use crate::db::records::ControlRecordRepo;
use crate::db::repository::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::control_record::{ControlRecord, RecordKey};
use crate::models::control_state::{ControlState, Transition};
use crate::models::km_history::KmHistoryEntry;
use rusqlite::Connection;

pub struct OdometerLogic;

impl OdometerLogic {
    /// Store a weekly odometer reading and re-evaluate the record's state.
    ///
    /// `expected_version`, when given, must match the stored record.
    pub fn register(
        ctx: &mut LedgerContext,
        key: RecordKey,
        km: i64,
        expected_version: Option<i64>,
    ) -> AppResult<ControlRecord> {
        let tx = ctx.pool.conn.transaction()?;
        let rec = Self::register_in(&tx, key, km, expected_version, &ctx.operator)?;
        tx.commit()?;
        Ok(rec)
    }

    pub(crate) fn register_in(
        conn: &Connection,
        key: RecordKey,
        km: i64,
        expected_version: Option<i64>,
        operator: &str,
    ) -> AppResult<ControlRecord> {
        let records = ControlRecordRepo::new(conn);
        let mut rec = records.require(&key)?;

        expect_version(&rec, expected_version)?;
        ensure_open(&rec)?;
        rec.state.check(Transition::RegisterOdometer)?;
        validate_reading(&rec, km)?;

        let cfg = MaintenanceConfigRepo::new(conn).get(&key.vehicle_id)?;
        let alerts = cfg
            .as_ref()
            .map(|c| MaintenanceAlertEngine::evaluate_reading(rec.km_previous, km, c))
            .unwrap_or_default();

        KmHistoryRepo::new(conn).append(key, km, &LedgerContext::now(), operator)?;

        rec.km_current = km;
        rec.state = ControlState::after_reading(alerts.change_due());
        let stored = records.upsert(&rec)?;

        ttlog(
            conn,
            "odometer",
            &key.to_string(),
            &format!("{} km by {} → {}{}", km, operator, stored.state, alert_suffix(&alerts.tags())),
        )?;

        Ok(stored)
    }

    /// Every reading ever taken for a vehicle, oldest first.
    pub fn history(ctx: &LedgerContext, vehicle_id: i64) -> AppResult<Vec<KmHistoryEntry>> {
        KmHistoryRepo::new(&ctx.pool.conn).list_for_vehicle(vehicle_id)
    }
}

fn validate_reading(rec: &ControlRecord, km: i64) -> AppResult<()> {
    if km < 0 {
        return Err(AppError::Validation(format!(
            "odometer reading must not be negative (got {})",
            km
        )));
    }
    if km < rec.km_current {
        return Err(AppError::Validation(format!(
            "odometer reading {} is below the current reading {} for {}",
            km,
            rec.km_current,
            rec.key()
        )));
    }
    if km < rec.km_previous {
        return Err(AppError::Validation(format!(
            "odometer reading {} is below the previous reading {} for {}",
            km,
            rec.km_previous,
            rec.key()
        )));
    }
    Ok(())
}

fn alert_suffix(tags: &str) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags)
    }
}
