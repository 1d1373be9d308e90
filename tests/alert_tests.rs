mod common;

use common::ledger;
use fleetledger::core::alerts::MaintenanceAlertEngine;
use fleetledger::core::maintenance::MaintenanceLogic;
use fleetledger::core::odometer::OdometerLogic;
use fleetledger::core::query::GridQuery;
use fleetledger::core::sync::SyncLogic;
use fleetledger::models::control_record::{ControlRecord, RecordKey};
use fleetledger::models::control_state::ControlState;
use fleetledger::models::maintenance_config::{ConfigPatch, VehicleMaintenanceConfig};

fn cfg() -> VehicleMaintenanceConfig {
    VehicleMaintenanceConfig {
        vehicle_id: 1,
        oil_interval_km: 10_000,
        last_oil_change_km: 20_000,
        has_belt: true,
        belt_interval_km: 60_000,
        last_belt_change_km: 0,
        weekly_km_allowance: 1_500,
        updated_at: String::new(),
    }
}

fn record(km_previous: i64, km_current: i64) -> ControlRecord {
    let mut r = ControlRecord::opened(RecordKey::new(1, 1), km_previous, ControlState::Normal, None);
    r.km_current = km_current;
    r
}

#[test]
fn oil_alert_at_exact_interval() {
    let c = cfg();
    assert!(!MaintenanceAlertEngine::evaluate_reading(29_000, 29_999, &c).oil);
    assert!(MaintenanceAlertEngine::evaluate_reading(29_000, 30_000, &c).oil);
}

#[test]
fn belt_alert_needs_a_belt() {
    let mut c = cfg();
    assert!(MaintenanceAlertEngine::evaluate_reading(59_500, 60_000, &c).belt);

    c.has_belt = false;
    assert!(!MaintenanceAlertEngine::evaluate_reading(59_500, 60_000, &c).belt);
}

#[test]
fn overage_is_strictly_above_allowance() {
    let c = cfg();
    assert!(!MaintenanceAlertEngine::evaluate_reading(21_000, 22_500, &c).overage);
    assert!(MaintenanceAlertEngine::evaluate_reading(21_000, 22_501, &c).overage);
}

#[test]
fn unread_record_raises_nothing() {
    let c = cfg();
    let alerts = MaintenanceAlertEngine::evaluate(&record(90_000, 0), Some(&c));
    assert!(alerts.is_empty());
    assert!(!alerts.change_due());

    let rem = MaintenanceAlertEngine::remaining(&record(90_000, 0), Some(&c));
    assert_eq!(rem.oil_km, None);
}

#[test]
fn missing_config_raises_nothing() {
    let alerts = MaintenanceAlertEngine::evaluate(&record(0, 999_999), None);
    assert!(alerts.is_empty());
}

#[test]
fn remaining_goes_negative_when_overdue() {
    let c = cfg();
    let rem = MaintenanceAlertEngine::remaining(&record(30_000, 31_000), Some(&c));
    assert_eq!(rem.oil_km, Some(-1_000));
    assert_eq!(rem.belt_km, Some(29_000));
}

#[test]
fn alert_tags_are_stable() {
    let alerts = MaintenanceAlertEngine::evaluate(&record(20_000, 62_000), Some(&cfg()));
    assert_eq!(alerts.tags(), "oil,belt,overage");
}

#[test]
fn grid_read_survives_vehicles_without_config() {
    let mut ctx = ledger("alerts_grid_no_config", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");

    MaintenanceLogic::update(
        &mut ctx,
        2,
        &ConfigPatch {
            oil_interval_km: Some(1_000),
            ..Default::default()
        },
    )
    .expect("config for 2");

    OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 50_000, None).expect("v1");
    let rec = OdometerLogic::register(&mut ctx, RecordKey::new(1, 2), 1_000, None).expect("v2");
    assert_eq!(rec.state, ControlState::NeedsScheduling);

    let grid = GridQuery::week_grid(&ctx, 1).expect("grid");
    assert_eq!(grid.rows.len(), 3);

    let v1 = &grid.rows[0];
    assert!(v1.config.is_none());
    assert!(v1.alerts.is_empty());
    assert_eq!(v1.record.state, ControlState::Normal);
    assert_eq!(v1.plate.as_deref(), Some("AB-123-CD"));

    let v2 = &grid.rows[1];
    assert!(v2.alerts.oil);
}
