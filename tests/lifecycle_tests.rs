mod common;

use common::ledger;
use fleetledger::core::context::LedgerContext;
use fleetledger::core::maintenance::MaintenanceLogic;
use fleetledger::core::odometer::OdometerLogic;
use fleetledger::core::query::GridQuery;
use fleetledger::core::service::ServiceLifecycle;
use fleetledger::core::sync::SyncLogic;
use fleetledger::core::week::WeekLifecycle;
use fleetledger::db::records::ControlRecordRepo;
use fleetledger::db::repository::Repository;
use fleetledger::errors::AppError;
use fleetledger::models::control_record::RecordKey;
use fleetledger::models::control_state::ControlState;
use fleetledger::models::maintenance_config::ConfigPatch;
use fleetledger::models::service_event::{ServiceKind, ServiceStatus};

fn oil_config(ctx: &mut LedgerContext, vehicle: i64) {
    MaintenanceLogic::update(
        ctx,
        vehicle,
        &ConfigPatch {
            oil_interval_km: Some(5_000),
            last_oil_change_km: Some(0),
            weekly_km_allowance: Some(1_000),
            ..Default::default()
        },
    )
    .expect("maintenance config");
}

fn assert_stale<T: std::fmt::Debug>(res: Result<T, AppError>) {
    match res {
        Err(e @ AppError::Conflict(_)) => assert!(e.is_retryable()),
        other => panic!("expected Conflict, got {other:?}"),
    }
}

fn assert_rejected<T: std::fmt::Debug>(res: Result<T, AppError>) {
    match res {
        Err(e @ AppError::StateConflict(_)) => {
            assert!(!e.is_retryable());
            assert_eq!(e.exit_code(), 4);
        }
        other => panic!("expected StateConflict, got {other:?}"),
    }
}

fn assert_validation<T: std::fmt::Debug>(res: Result<T, AppError>) {
    match res {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn two_week_oil_scenario() {
    let mut ctx = ledger("lifecycle_scenario", 2);
    oil_config(&mut ctx, 1);
    let w1 = RecordKey::new(1, 1);
    let w2 = RecordKey::new(2, 1);

    // 1. first week opens unread
    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    let grid = GridQuery::week_grid(&ctx, 1).expect("grid 1");
    let row = &grid.rows[0];
    assert_eq!(row.record.km_previous, 0);
    assert_eq!(row.record.km_current, 0);
    assert_eq!(row.record.state, ControlState::RequestPending);
    assert!(row.alerts.is_empty());

    // 2. 1500 km: over the allowance, oil not due
    let rec = OdometerLogic::register(&mut ctx, w1, 1_500, None).expect("register 1500");
    assert_eq!(rec.km_current, 1_500);
    assert_eq!(rec.state, ControlState::Normal);
    let row = &GridQuery::week_grid(&ctx, 1).expect("grid 1").rows[0];
    assert!(row.alerts.overage);
    assert!(!row.alerts.oil);

    // 3. second week carries the reading
    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    let row = &GridQuery::week_grid(&ctx, 2).expect("grid 2").rows[0];
    assert_eq!(row.record.km_previous, 1_500);
    assert_eq!(row.record.km_current, 0);
    assert_eq!(row.record.state, ControlState::RequestPending);

    // 4. 5200 km: overage and oil due
    let rec = OdometerLogic::register(&mut ctx, w2, 5_200, None).expect("register 5200");
    assert_eq!(rec.state, ControlState::NeedsScheduling);
    let row = &GridQuery::week_grid(&ctx, 2).expect("grid 2").rows[0];
    assert!(row.alerts.overage);
    assert!(row.alerts.oil);

    // 5. schedule → enter → exit with an oil change
    let out = ServiceLifecycle::schedule(&mut ctx, w2, ServiceKind::Oil, None).expect("schedule");
    assert_eq!(out.record.state, ControlState::Scheduled);
    assert_eq!(out.event.status, ServiceStatus::Scheduled);

    let out = ServiceLifecycle::enter_shop(&mut ctx, w2, None).expect("enter");
    assert_eq!(out.record.state, ControlState::InService);
    assert_eq!(out.event.status, ServiceStatus::InProgress);

    let out = ServiceLifecycle::exit_shop(&mut ctx, w2, &[ServiceKind::Oil], None).expect("exit");
    assert_eq!(out.record.state, ControlState::Normal);
    assert_eq!(out.event.status, ServiceStatus::Completed);
    assert_eq!(out.event.serviced, vec![ServiceKind::Oil]);

    let cfg = MaintenanceLogic::get(&ctx, 1).expect("get").expect("config");
    assert_eq!(cfg.last_oil_change_km, 5_200);

    let row = &GridQuery::week_grid(&ctx, 2).expect("grid 2").rows[0];
    assert!(!row.alerts.oil);
    assert!(row.open_service.is_none());
    assert_eq!(row.remaining.oil_km, Some(5_000));
}

#[test]
fn registration_rejects_bad_readings() {
    let mut ctx = ledger("lifecycle_bad_readings", 2);
    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    let key = RecordKey::new(1, 1);

    assert_validation(OdometerLogic::register(&mut ctx, key, -5, None));

    OdometerLogic::register(&mut ctx, key, 2_000, None).expect("register");
    assert_validation(OdometerLogic::register(&mut ctx, key, 1_999, None));

    // same value again is allowed
    OdometerLogic::register(&mut ctx, key, 2_000, None).expect("re-register");

    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    assert_validation(OdometerLogic::register(&mut ctx, RecordKey::new(2, 1), 1_000, None));
}

#[test]
fn registration_on_missing_record_is_not_found() {
    let mut ctx = ledger("lifecycle_missing_record", 1);
    let err = OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 10, None).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[test]
fn stale_version_is_a_conflict() {
    let mut ctx = ledger("lifecycle_stale_version", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");
    let key = RecordKey::new(1, 1);

    OdometerLogic::register(&mut ctx, key, 100, Some(1)).expect("first writer");
    assert_stale(OdometerLogic::register(&mut ctx, key, 200, Some(1)));
    assert_stale(ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Oil, Some(1)));

    // a stale copy written through the repository loses too
    let records = ControlRecordRepo::new(&ctx.pool.conn);
    let mut stale = records.require(&key).expect("record");
    stale.version = 1;
    stale.km_current = 999;
    assert_stale(records.upsert(&stale));
    assert_eq!(records.require(&key).expect("record").km_current, 100);
}

#[test]
fn closed_records_reject_every_transition() {
    let mut ctx = ledger("lifecycle_closed", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");
    let key = RecordKey::new(1, 1);
    OdometerLogic::register(&mut ctx, key, 100, None).expect("register");
    WeekLifecycle::close(&mut ctx, 1).expect("close");

    assert_rejected(OdometerLogic::register(&mut ctx, key, 200, None));
    assert_rejected(ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Oil, None));
    assert_rejected(ServiceLifecycle::request_unplanned(&mut ctx, key, ServiceKind::Other, None));
}

#[test]
fn transition_table_is_enforced() {
    let mut ctx = ledger("lifecycle_transitions", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");
    let key = RecordKey::new(1, 1);

    // RequestPending: nothing to schedule, start or exit yet
    assert_rejected(ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Oil, None));
    let err = ServiceLifecycle::enter_shop(&mut ctx, key, None).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "no booking to start, got {err:?}");
    assert_rejected(ServiceLifecycle::exit_shop(&mut ctx, key, &[], None));

    OdometerLogic::register(&mut ctx, key, 100, None).expect("register");
    ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Belt, None).expect("schedule");

    // Scheduled: readings and a second booking are refused
    assert_rejected(OdometerLogic::register(&mut ctx, key, 150, None));
    assert_rejected(ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Oil, None));
    assert_rejected(ServiceLifecycle::exit_shop(&mut ctx, key, &[], None));

    ServiceLifecycle::enter_shop(&mut ctx, key, None).expect("enter");

    // InService: only exit
    assert_rejected(OdometerLogic::register(&mut ctx, key, 150, None));
    assert_rejected(ServiceLifecycle::enter_shop(&mut ctx, key, None));
    assert_rejected(ServiceLifecycle::request_unplanned(&mut ctx, key, ServiceKind::Other, None));

    let out = ServiceLifecycle::exit_shop(&mut ctx, key, &[], None).expect("exit");
    assert_eq!(out.record.state, ControlState::Normal);
}

#[test]
fn unplanned_visit_opens_and_closes() {
    let mut ctx = ledger("lifecycle_unplanned", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");
    let key = RecordKey::new(1, 2);

    // allowed straight from RequestPending
    let out = ServiceLifecycle::request_unplanned(&mut ctx, key, ServiceKind::Other, None)
        .expect("unplanned");
    assert_eq!(out.record.state, ControlState::InService);
    assert!(out.event.unplanned);
    assert_eq!(out.event.status, ServiceStatus::InProgress);

    // no reading yet → back to waiting for one
    let out = ServiceLifecycle::exit_shop(&mut ctx, key, &[ServiceKind::Other], None).expect("exit");
    assert_eq!(out.record.state, ControlState::RequestPending);

    let events = ServiceLifecycle::list(&ctx, 2).expect("list");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, ServiceStatus::Completed);
}

#[test]
fn unplanned_visit_promotes_a_scheduled_one() {
    let mut ctx = ledger("lifecycle_promote", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");
    let key = RecordKey::new(1, 1);
    OdometerLogic::register(&mut ctx, key, 100, None).expect("register");

    let booked = ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Oil, None).expect("schedule");
    let out = ServiceLifecycle::request_unplanned(&mut ctx, key, ServiceKind::Oil, None)
        .expect("unplanned");

    assert_eq!(out.event.id, booked.event.id);
    assert_eq!(out.event.status, ServiceStatus::InProgress);
    assert_eq!(ServiceLifecycle::list(&ctx, 1).expect("list").len(), 1);
}

#[test]
fn visit_can_be_closed_from_a_later_week() {
    let mut ctx = ledger("lifecycle_cross_week", 2);
    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    let w1 = RecordKey::new(1, 1);
    OdometerLogic::register(&mut ctx, w1, 4_000, None).expect("register");
    ServiceLifecycle::request_unplanned(&mut ctx, w1, ServiceKind::Oil, None).expect("unplanned");
    WeekLifecycle::close(&mut ctx, 1).expect("close 1");

    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    let w2 = RecordKey::new(2, 1);
    let out = ServiceLifecycle::exit_shop(&mut ctx, w2, &[ServiceKind::Oil, ServiceKind::Oil], None)
        .expect("exit from week 2");

    assert_eq!(out.event.week_id, 1);
    assert_eq!(out.event.serviced, vec![ServiceKind::Oil]);
    assert_eq!(out.record.state, ControlState::RequestPending);

    // vehicle had no config: one is created from the defaults
    let cfg = MaintenanceLogic::get(&ctx, 1).expect("get").expect("config");
    assert_eq!(cfg.last_oil_change_km, 4_000);
    assert_eq!(cfg.oil_interval_km, ctx.defaults.oil_interval_km);
}

#[test]
fn visit_booked_in_one_week_starts_from_the_next() {
    let mut ctx = ledger("lifecycle_cross_week_enter", 2);
    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    let w1 = RecordKey::new(1, 1);
    OdometerLogic::register(&mut ctx, w1, 4_000, None).expect("register w1");
    let booked = ServiceLifecycle::schedule(&mut ctx, w1, ServiceKind::Oil, None).expect("schedule");
    WeekLifecycle::close(&mut ctx, 1).expect("close 1");

    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    let w2 = RecordKey::new(2, 1);
    let rec = OdometerLogic::register(&mut ctx, w2, 4_500, None).expect("register w2");
    assert_eq!(rec.state, ControlState::Normal);

    // a second booking is still refused while the first is open
    assert_rejected(ServiceLifecycle::schedule(&mut ctx, w2, ServiceKind::Oil, None));

    let out = ServiceLifecycle::enter_shop(&mut ctx, w2, None).expect("enter from week 2");
    assert_eq!(out.event.id, booked.event.id);
    assert_eq!(out.event.week_id, 1);
    assert_eq!(out.event.status, ServiceStatus::InProgress);
    assert_eq!(out.record.state, ControlState::InService);

    assert_rejected(ServiceLifecycle::enter_shop(&mut ctx, w2, None));

    let out = ServiceLifecycle::exit_shop(&mut ctx, w2, &[ServiceKind::Oil], None).expect("exit");
    assert_eq!(out.event.status, ServiceStatus::Completed);
    assert_eq!(out.record.state, ControlState::Normal);
    let cfg = MaintenanceLogic::get(&ctx, 1).expect("get").expect("config");
    assert_eq!(cfg.last_oil_change_km, 4_500);
}

#[test]
fn maintenance_update_validates_and_requires_vehicle() {
    let mut ctx = ledger("lifecycle_maint", 1);

    let err = MaintenanceLogic::update(
        &mut ctx,
        1,
        &ConfigPatch {
            oil_interval_km: Some(-1),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    let err = MaintenanceLogic::update(
        &mut ctx,
        42,
        &ConfigPatch {
            oil_interval_km: Some(8_000),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let cfg = MaintenanceLogic::update(
        &mut ctx,
        1,
        &ConfigPatch {
            has_belt: Some(true),
            ..Default::default()
        },
    )
    .expect("belt on");
    assert!(cfg.has_belt);
    assert_eq!(cfg.belt_interval_km, ctx.defaults.belt_interval_km);
    assert!(MaintenanceLogic::get(&ctx, 2).expect("get").is_none());
}

#[test]
fn readings_are_kept_in_history() {
    let mut ctx = ledger("lifecycle_history", 2);
    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 100, None).expect("r1");
    OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 150, None).expect("r2");
    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    OdometerLogic::register(&mut ctx, RecordKey::new(2, 1), 900, None).expect("r3");

    let history = OdometerLogic::history(&ctx, 1).expect("history");
    let kms: Vec<i64> = history.iter().map(|h| h.km).collect();
    assert_eq!(kms, vec![100, 150, 900]);
    assert!(history.iter().all(|h| h.operator == "tester"));
}

#[test]
fn odometer_history_is_kept_per_reading() {
    let mut ctx = ledger("lifecycle_history", 2);
    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 800, None).expect("first");
    OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 900, None).expect("correction");
    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    OdometerLogic::register(&mut ctx, RecordKey::new(2, 1), 1_700, None).expect("week 2");

    let history = OdometerLogic::history(&ctx, 1).expect("history");
    let kms: Vec<(i64, i64)> = history.iter().map(|e| (e.week_id, e.km)).collect();
    assert_eq!(kms, vec![(1, 800), (1, 900), (2, 1_700)]);
    assert!(history.iter().all(|e| e.operator == "tester"));

    assert!(OdometerLogic::history(&ctx, 3).expect("empty").is_empty());
}
