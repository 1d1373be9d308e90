//! Reconciles one grid week into control records.
//!
//! Running it again is safe: existing rows are left alone, except that an
//! unread, open record follows later edits of the grid's assignment lines.

use crate::core::context::LedgerContext;
use crate::core::ports::{SchedulingGrid, VehicleCatalog};
use crate::db::grid::{VehicleRepo, WeekRepo};
use crate::db::log::ttlog;
use crate::db::records::ControlRecordRepo;
use crate::db::repository::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::control_record::{ControlRecord, RecordKey};
use crate::models::control_state::ControlState;
use crate::models::week::{AssignmentLine, LAST_DAY};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub week_id: i64,
    pub created: usize,
    pub reassigned: usize,
    pub unchanged: usize,
    /// Vehicles not added because the week is already closed.
    pub skipped: usize,
}

pub struct SyncLogic;

impl SyncLogic {
    /// Sync `week_id` against the grid and catalog stored in the tenant database.
    /// The whole week commits or nothing does.
    pub fn sync(ctx: &mut LedgerContext, week_id: i64) -> AppResult<SyncReport> {
        let tx = ctx
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let report = {
            let grid = WeekRepo::new(&tx);
            let catalog = VehicleRepo::new(&tx);
            Self::sync_with(&tx, &grid, &catalog, week_id, &ctx.operator)?
        };

        tx.commit()?;
        Ok(report)
    }

    /// Core of the reconciliation. `conn` should be an open transaction.
    pub fn sync_with(
        conn: &Connection,
        grid: &dyn SchedulingGrid,
        catalog: &dyn VehicleCatalog,
        week_id: i64,
        operator: &str,
    ) -> AppResult<SyncReport> {
        let week = grid
            .week(week_id)?
            .ok_or_else(|| AppError::NotFound(format!("week {} in the scheduling grid", week_id)))?;

        let records = ControlRecordRepo::new(conn);
        let existing = records.list_for_week(week_id)?;
        let week_closed = !existing.is_empty() && existing.iter().all(|r| r.closed);

        let mut report = SyncReport {
            week_id,
            ..Default::default()
        };

        for vehicle in catalog.active_vehicles()? {
            let key = RecordKey::new(week_id, vehicle.id);
            let client = resolve_client(&week.lines_for(vehicle.id));

            match existing.iter().find(|r| r.vehicle_id == vehicle.id) {
                Some(rec) if !rec.closed && !rec.is_read() && rec.assigned_client != client => {
                    let mut updated = rec.clone();
                    updated.assigned_client = client;
                    records.upsert(&updated)?;
                    report.reassigned += 1;
                }
                Some(_) => report.unchanged += 1,
                None if week_closed => report.skipped += 1,
                None => {
                    let prior = records.latest_before(vehicle.id, week_id)?;
                    let (km_previous, state) = carry_forward(prior.as_ref());
                    records.upsert(&ControlRecord::opened(key, km_previous, state, client))?;
                    report.created += 1;
                }
            }
        }

        ttlog(
            conn,
            "sync",
            &format!("week {}", week_id),
            &format!(
                "by {}: created {}, reassigned {}, unchanged {}, skipped {}",
                operator, report.created, report.reassigned, report.unchanged, report.skipped
            ),
        )?;

        Ok(report)
    }
}

/// Starting odometer and state for a new week, from the vehicle's most
/// recent earlier record.
///
/// An unread prior record hands on its own `km_previous`, so a value survives
/// any number of skipped weeks. A shop visit in progress stays in progress.
pub fn carry_forward(prior: Option<&ControlRecord>) -> (i64, ControlState) {
    match prior {
        None => (0, ControlState::RequestPending),
        Some(p) => {
            let km = if p.is_read() { p.km_current } else { p.km_previous };
            let state = if p.state == ControlState::InService {
                ControlState::InService
            } else {
                ControlState::RequestPending
            };
            (km, state)
        }
    }
}

/// Day-7 rule: which client holds the vehicle at the end of the week.
///
/// One line → its client. Several lines → the first one covering the last
/// day of the cycle. Otherwise unset.
pub fn resolve_client(lines: &[&AssignmentLine]) -> Option<i64> {
    match lines {
        [] => None,
        [only] => only.client_id,
        many => many
            .iter()
            .find(|l| l.covers(LAST_DAY))
            .and_then(|l| l.client_id),
    }
}
