//! Shop visits: schedule, enter, exit, or go in unplanned.
//!
//! A visit is tracked per vehicle, not per week. It may be scheduled in one
//! week and closed out from a later week's record while the vehicle is still
//! in service.

use crate::core::alerts::MaintenanceAlertEngine;
use crate::core::context::{LedgerContext, MaintenanceDefaults};
use crate::core::guards::{ensure_open, expect_version};
use crate::db::configs::MaintenanceConfigRepo;
use crate::db::log::ttlog;
use crate::db::records::ControlRecordRepo;
use crate::db::repository::Repository;
use crate::db::services::ServiceEventRepo;
use crate::errors::{AppError, AppResult};
use crate::models::control_record::{ControlRecord, RecordKey};
use crate::models::control_state::{ControlState, Transition};
use crate::models::maintenance_config::VehicleMaintenanceConfig;
use crate::models::service_event::{ServiceEvent, ServiceKind, ServiceStatus};
use rusqlite::Connection;
use serde::Serialize;

/// Record and event after a lifecycle step, both as stored.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutcome {
    pub record: ControlRecord,
    pub event: ServiceEvent,
}

pub struct ServiceLifecycle;

impl ServiceLifecycle {
    pub fn schedule(
        ctx: &mut LedgerContext,
        key: RecordKey,
        kind: ServiceKind,
        expected_version: Option<i64>,
    ) -> AppResult<ServiceOutcome> {
        let tx = ctx.pool.conn.transaction()?;
        let out = {
            let (records, events, mut rec) = load(&tx, key, expected_version, Transition::Schedule)?;

            if let Some(open) = events.open_for_vehicle(key.vehicle_id)? {
                return Err(already_open(&open));
            }

            let event = events.upsert(&ServiceEvent::scheduled(key, kind, &LedgerContext::now()))?;
            rec.state = ControlState::Scheduled;
            let record = records.upsert(&rec)?;

            ttlog(&tx, "service_schedule", &key.to_string(), &format!("{} by {}", kind.to_db_str(), ctx.operator))?;
            ServiceOutcome { record, event }
        };
        tx.commit()?;
        Ok(out)
    }

    /// Start the vehicle's booked visit. The booking is looked up per vehicle,
    /// so it may have been made from an earlier week's record.
    pub fn enter_shop(
        ctx: &mut LedgerContext,
        key: RecordKey,
        expected_version: Option<i64>,
    ) -> AppResult<ServiceOutcome> {
        let tx = ctx.pool.conn.transaction()?;
        let out = {
            let (records, events, mut rec) = load(&tx, key, expected_version, Transition::EnterShop)?;

            let mut event = events
                .open_for_vehicle(key.vehicle_id)?
                .ok_or_else(|| AppError::NotFound(format!("scheduled service for vehicle {}", key.vehicle_id)))?;
            if event.status != ServiceStatus::Scheduled {
                return Err(AppError::StateConflict(format!(
                    "service event {} is already in progress",
                    event.id
                )));
            }

            event.status = ServiceStatus::InProgress;
            event.entered_at = Some(LedgerContext::now());
            let event = events.upsert(&event)?;

            rec.state = ControlState::InService;
            let record = records.upsert(&rec)?;

            ttlog(&tx, "service_enter", &key.to_string(), &format!("event {} by {}", event.id, ctx.operator))?;
            ServiceOutcome { record, event }
        };
        tx.commit()?;
        Ok(out)
    }

    /// Emergency visit. A pending scheduled visit is promoted instead of
    /// opening a second one.
    pub fn request_unplanned(
        ctx: &mut LedgerContext,
        key: RecordKey,
        kind: ServiceKind,
        expected_version: Option<i64>,
    ) -> AppResult<ServiceOutcome> {
        let tx = ctx.pool.conn.transaction()?;
        let out = {
            let (records, events, mut rec) = load(&tx, key, expected_version, Transition::Unplanned)?;
            let now = LedgerContext::now();

            let event = match events.open_for_vehicle(key.vehicle_id)? {
                Some(mut ev) if ev.status == ServiceStatus::Scheduled => {
                    ev.status = ServiceStatus::InProgress;
                    ev.entered_at = Some(now);
                    events.upsert(&ev)?
                }
                Some(ev) => return Err(already_open(&ev)),
                None => events.upsert(&ServiceEvent::unplanned(key, kind, &now))?,
            };

            rec.state = ControlState::InService;
            let record = records.upsert(&rec)?;

            ttlog(
                &tx,
                "service_unplanned",
                &key.to_string(),
                &format!("{} event {} by {}", kind.to_db_str(), event.id, ctx.operator),
            )?;
            ServiceOutcome { record, event }
        };
        tx.commit()?;
        Ok(out)
    }

    /// Complete the open visit. Each serviced kind resets its change
    /// baseline to the vehicle's last known odometer.
    pub fn exit_shop(
        ctx: &mut LedgerContext,
        key: RecordKey,
        serviced: &[ServiceKind],
        expected_version: Option<i64>,
    ) -> AppResult<ServiceOutcome> {
        let defaults = ctx.defaults;
        let tx = ctx.pool.conn.transaction()?;
        let out = {
            let (records, events, mut rec) = load(&tx, key, expected_version, Transition::ExitShop)?;

            let mut event = events
                .open_for_vehicle(key.vehicle_id)?
                .ok_or_else(|| AppError::NotFound(format!("open service for vehicle {}", key.vehicle_id)))?;
            if event.status != ServiceStatus::InProgress {
                return Err(AppError::StateConflict(format!(
                    "service event {} has not entered the shop",
                    event.id
                )));
            }

            let mut kinds = serviced.to_vec();
            kinds.sort_by_key(|k| k.to_db_str());
            kinds.dedup();

            event.status = ServiceStatus::Completed;
            event.exited_at = Some(LedgerContext::now());
            event.serviced = kinds.clone();
            let event = events.upsert(&event)?;

            let odometer = rec.last_known_km();
            let cfg = reset_baselines(&tx, &defaults, key.vehicle_id, &kinds, odometer)?;

            rec.state = if rec.is_read() {
                let alerts = MaintenanceAlertEngine::evaluate(&rec, cfg.as_ref());
                ControlState::after_reading(alerts.change_due())
            } else {
                ControlState::RequestPending
            };
            let record = records.upsert(&rec)?;

            ttlog(
                &tx,
                "service_exit",
                &key.to_string(),
                &format!(
                    "event {} serviced [{}] at {} km by {} → {}",
                    event.id,
                    ServiceKind::list_to_db_str(&kinds),
                    odometer,
                    ctx.operator,
                    record.state
                ),
            )?;
            ServiceOutcome { record, event }
        };
        tx.commit()?;
        Ok(out)
    }

    /// All visits of a vehicle, oldest first.
    pub fn list(ctx: &LedgerContext, vehicle_id: i64) -> AppResult<Vec<ServiceEvent>> {
        ServiceEventRepo::new(&ctx.pool.conn).list_for_vehicle(vehicle_id)
    }
}

fn load<'c>(
    conn: &'c Connection,
    key: RecordKey,
    expected_version: Option<i64>,
    transition: Transition,
) -> AppResult<(ControlRecordRepo<'c>, ServiceEventRepo<'c>, ControlRecord)> {
    let records = ControlRecordRepo::new(conn);
    let rec = records.require(&key)?;

    expect_version(&rec, expected_version)?;
    ensure_open(&rec)?;
    rec.state.check(transition)?;

    Ok((records, ServiceEventRepo::new(conn), rec))
}

/// Returns the vehicle's config after the reset, or its current one when
/// nothing oil or belt related was serviced.
fn reset_baselines(
    conn: &Connection,
    defaults: &MaintenanceDefaults,
    vehicle_id: i64,
    kinds: &[ServiceKind],
    odometer: i64,
) -> AppResult<Option<VehicleMaintenanceConfig>> {
    let configs = MaintenanceConfigRepo::new(conn);
    let current = configs.get(&vehicle_id)?;

    let oil = kinds.contains(&ServiceKind::Oil);
    let belt = kinds.contains(&ServiceKind::Belt);
    if !oil && !belt {
        return Ok(current);
    }

    let mut cfg = current.unwrap_or_else(|| defaults.config_for(vehicle_id));
    if oil {
        cfg.last_oil_change_km = odometer;
    }
    if belt {
        cfg.last_belt_change_km = odometer;
    }
    Ok(Some(configs.upsert(&cfg)?))
}

fn already_open(ev: &ServiceEvent) -> AppError {
    AppError::StateConflict(format!(
        "vehicle {} already has an open service event {} ({})",
        ev.vehicle_id,
        ev.id,
        ev.status.to_db_str()
    ))
}
