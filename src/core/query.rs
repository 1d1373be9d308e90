//! Read-side projections: the week list and the per-week grid.
//!
//! Nothing here writes. A vehicle without a maintenance config simply shows
//! no alerts.

use crate::core::alerts::{MaintenanceAlertEngine, Remaining};
use crate::core::context::LedgerContext;
use crate::core::ports::SchedulingGrid;
use crate::db::configs::MaintenanceConfigRepo;
use crate::db::grid::{VehicleRepo, WeekRepo};
use crate::db::records::ControlRecordRepo;
use crate::db::repository::Repository;
use crate::db::services::ServiceEventRepo;
use crate::errors::{AppError, AppResult};
use crate::models::alert::AlertSet;
use crate::models::control_record::ControlRecord;
use crate::models::maintenance_config::VehicleMaintenanceConfig;
use crate::models::service_event::ServiceEvent;
use crate::models::week::{Week, WeekStatus, WeekSummary};
use serde::Serialize;

pub struct WeekQuery;

impl WeekQuery {
    /// Grid weeks in ascending order with their ledger status.
    pub fn list_weeks(ctx: &LedgerContext) -> AppResult<Vec<WeekSummary>> {
        let conn = &ctx.pool.conn;
        let weeks = WeekRepo::new(conn).weeks()?;
        let counts = ControlRecordRepo::new(conn).counts_by_week()?;

        Ok(weeks
            .into_iter()
            .map(|w| {
                let (total, closed) = counts.get(&w.id).copied().unwrap_or((0, 0));
                WeekSummary {
                    id: w.id,
                    start_date: w.start_date,
                    end_date: w.end_date,
                    records: total,
                    status: WeekStatus::from_counts(total, closed),
                }
            })
            .collect())
    }

    /// Earliest week that has never been synced.
    pub fn next_to_sync(ctx: &LedgerContext) -> AppResult<Option<WeekSummary>> {
        Ok(Self::list_weeks(ctx)?
            .into_iter()
            .find(|w| w.status == WeekStatus::Pending))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub plate: Option<String>,
    pub record: ControlRecord,
    pub alerts: AlertSet,
    pub remaining: Remaining,
    pub config: Option<VehicleMaintenanceConfig>,
    /// The vehicle's current shop visit; only attached to open records.
    pub open_service: Option<ServiceEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid {
    /// `None` when the grid no longer knows the week but records remain.
    pub week: Option<Week>,
    pub status: WeekStatus,
    pub rows: Vec<GridRow>,
}

pub struct GridQuery;

impl GridQuery {
    pub fn week_grid(ctx: &LedgerContext, week_id: i64) -> AppResult<WeekGrid> {
        let conn = &ctx.pool.conn;
        let week = WeekRepo::new(conn).week(week_id)?;
        let records = ControlRecordRepo::new(conn).list_for_week(week_id)?;

        if week.is_none() && records.is_empty() {
            return Err(AppError::NotFound(format!("week {}", week_id)));
        }

        let configs = MaintenanceConfigRepo::new(conn).all_by_vehicle()?;
        let vehicles = VehicleRepo::new(conn);
        let events = ServiceEventRepo::new(conn);

        let closed = records.iter().filter(|r| r.closed).count() as i64;
        let status = WeekStatus::from_counts(records.len() as i64, closed);

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let config = configs.get(&record.vehicle_id).cloned();
            let open_service = if record.closed {
                None
            } else {
                events.open_for_vehicle(record.vehicle_id)?
            };

            rows.push(GridRow {
                plate: vehicles.get(&record.vehicle_id)?.map(|v| v.plate),
                alerts: MaintenanceAlertEngine::evaluate(&record, config.as_ref()),
                remaining: MaintenanceAlertEngine::remaining(&record, config.as_ref()),
                config,
                open_service,
                record,
            });
        }

        Ok(WeekGrid { week, status, rows })
    }
}
