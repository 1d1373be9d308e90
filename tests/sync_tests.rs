mod common;

use common::{ledger, line, sample_snapshot};
use fleetledger::core::import::ImportLogic;
use fleetledger::core::ports::VehicleCatalog;
use fleetledger::core::odometer::OdometerLogic;
use fleetledger::core::service::ServiceLifecycle;
use fleetledger::core::sync::{SyncLogic, carry_forward, resolve_client};
use fleetledger::core::week::WeekLifecycle;
use fleetledger::db::grid::WeekRepo;
use fleetledger::db::records::ControlRecordRepo;
use fleetledger::db::repository::Repository;
use fleetledger::errors::{AppError, AppResult};
use fleetledger::models::control_record::{ControlRecord, RecordKey};
use fleetledger::models::control_state::ControlState;
use fleetledger::models::service_event::ServiceKind;
use fleetledger::models::vehicle::Vehicle;

fn week_records(ctx: &fleetledger::core::context::LedgerContext, week: i64) -> Vec<ControlRecord> {
    ControlRecordRepo::new(&ctx.pool.conn)
        .list_for_week(week)
        .expect("list records")
}

#[test]
fn sync_creates_one_record_per_active_vehicle() {
    let mut ctx = ledger("sync_creates", 1);

    let report = SyncLogic::sync(&mut ctx, 1).expect("sync");
    assert_eq!(report.created, 3);
    assert_eq!(report.unchanged, 0);

    let records = week_records(&ctx, 1);
    let vehicles: Vec<i64> = records.iter().map(|r| r.vehicle_id).collect();
    assert_eq!(vehicles, vec![1, 2, 3], "inactive vehicle 4 must be skipped");

    for r in &records {
        assert_eq!(r.km_previous, 0);
        assert_eq!(r.km_current, 0);
        assert_eq!(r.state, ControlState::RequestPending);
        assert!(!r.closed);
        assert_eq!(r.version, 1);
    }

    assert_eq!(records[0].assigned_client, Some(10));
    assert_eq!(records[1].assigned_client, Some(20));
    assert_eq!(records[2].assigned_client, None);
}

#[test]
fn sync_twice_yields_identical_records() {
    let mut ctx = ledger("sync_idempotent", 1);

    SyncLogic::sync(&mut ctx, 1).expect("first sync");
    let first = week_records(&ctx, 1);

    let report = SyncLogic::sync(&mut ctx, 1).expect("second sync");
    assert_eq!(report.created, 0);
    assert_eq!(report.reassigned, 0);
    assert_eq!(report.unchanged, 3);

    assert_eq!(week_records(&ctx, 1), first);
}

#[test]
fn sync_of_unknown_week_is_not_found_and_writes_nothing() {
    let mut ctx = ledger("sync_unknown", 1);

    let err = SyncLogic::sync(&mut ctx, 99).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    assert!(week_records(&ctx, 99).is_empty());
}

/// Catalog that lists vehicle 1 twice: the second insert hits the primary key.
struct DuplicatingCatalog;

impl VehicleCatalog for DuplicatingCatalog {
    fn active_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let v = |id: i64| Vehicle {
            id,
            plate: format!("DUP-{id}"),
            active: true,
        };
        Ok(vec![v(1), v(2), v(1)])
    }
}

#[test]
fn failed_sync_leaves_no_rows_for_the_week() {
    let mut ctx = ledger("sync_rollback", 1);

    {
        let tx = ctx.pool.conn.transaction().expect("begin");
        let grid = WeekRepo::new(&tx);
        let err = SyncLogic::sync_with(&tx, &grid, &DuplicatingCatalog, 1, "tester").unwrap_err();
        assert!(matches!(err, AppError::Db(_)), "got {err:?}");
        // dropped without commit
    }

    assert!(week_records(&ctx, 1).is_empty());
    let synced: i64 = ctx
        .pool
        .conn
        .query_row("SELECT COUNT(*) FROM log WHERE operation = 'sync'", [], |r| r.get(0))
        .expect("count log");
    assert_eq!(synced, 0);

    let report = SyncLogic::sync(&mut ctx, 1).expect("sync after rollback");
    assert_eq!(report.created, 3);
    assert_eq!(week_records(&ctx, 1).len(), 3);
}

#[test]
fn km_previous_carries_from_last_reading() {
    let mut ctx = ledger("sync_carry_reading", 2);

    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    OdometerLogic::register(&mut ctx, RecordKey::new(1, 1), 1_200, None).expect("register");

    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    let w2 = week_records(&ctx, 2);
    assert_eq!(w2[0].km_previous, 1_200);
    assert_eq!(w2[0].km_current, 0);
    assert_eq!(w2[0].state, ControlState::RequestPending);
    assert_eq!(w2[1].km_previous, 0);
}

#[test]
fn skipped_week_keeps_km_previous_unchanged() {
    let mut ctx = ledger("sync_skipped_week", 3);

    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    OdometerLogic::register(&mut ctx, RecordKey::new(1, 2), 800, None).expect("register");

    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    SyncLogic::sync(&mut ctx, 3).expect("sync 3");

    let w2 = week_records(&ctx, 2);
    let w3 = week_records(&ctx, 3);
    assert_eq!(w2[1].km_previous, 800);
    assert_eq!(w3[1].km_previous, w2[1].km_previous);
}

#[test]
fn in_service_state_carries_into_next_week() {
    let mut ctx = ledger("sync_in_service", 2);

    SyncLogic::sync(&mut ctx, 1).expect("sync 1");
    let key = RecordKey::new(1, 1);
    OdometerLogic::register(&mut ctx, key, 500, None).expect("register");
    ServiceLifecycle::schedule(&mut ctx, key, ServiceKind::Other, None).expect("schedule");
    ServiceLifecycle::enter_shop(&mut ctx, key, None).expect("enter");

    SyncLogic::sync(&mut ctx, 2).expect("sync 2");
    let w2 = week_records(&ctx, 2);
    assert_eq!(w2[0].state, ControlState::InService);
    assert_eq!(w2[0].km_previous, 500);
    assert_eq!(w2[1].state, ControlState::RequestPending);
}

#[test]
fn unread_record_follows_grid_reassignment() {
    let mut ctx = ledger("sync_reassign", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");

    OdometerLogic::register(&mut ctx, RecordKey::new(1, 2), 300, None).expect("register");

    let mut snap = sample_snapshot(1);
    snap.weeks[0].lines = vec![
        line(1, Some(11), &[0, 1, 2, 3, 4, 5, 6]),
        line(2, Some(21), &[0, 1, 2, 3, 4, 5, 6]),
    ];
    ImportLogic::import(&mut ctx, &snap).expect("reimport");

    let report = SyncLogic::sync(&mut ctx, 1).expect("resync");
    assert_eq!(report.reassigned, 1);

    let records = week_records(&ctx, 1);
    assert_eq!(records[0].assigned_client, Some(11));
    assert_eq!(records[0].version, 2);
    assert_eq!(records[1].assigned_client, Some(20), "read record keeps its client");
}

#[test]
fn closed_week_does_not_gain_new_records() {
    let mut ctx = ledger("sync_closed_week", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");
    WeekLifecycle::close(&mut ctx, 1).expect("close");

    let mut snap = sample_snapshot(1);
    snap.vehicles.push(Vehicle {
        id: 5,
        plate: "NEW-555".into(),
        active: true,
    });
    ImportLogic::import(&mut ctx, &snap).expect("reimport");

    let report = SyncLogic::sync(&mut ctx, 1).expect("resync");
    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(week_records(&ctx, 1).len(), 3);
}

#[test]
fn carry_forward_rules() {
    assert_eq!(carry_forward(None), (0, ControlState::RequestPending));

    let mut prior = ControlRecord::opened(RecordKey::new(1, 1), 400, ControlState::Normal, None);
    prior.km_current = 900;
    assert_eq!(carry_forward(Some(&prior)), (900, ControlState::RequestPending));

    prior.km_current = 0;
    prior.state = ControlState::InService;
    assert_eq!(carry_forward(Some(&prior)), (400, ControlState::InService));
}

#[test]
fn day_seven_rule() {
    let a = line(1, Some(10), &[0, 1, 2]);
    let b = line(1, Some(20), &[3, 4, 5, 6]);
    let c = line(1, Some(30), &[3, 4]);
    let unassigned = line(1, None, &[0, 1, 2, 3, 4, 5, 6]);

    // single line wins regardless of its days
    assert_eq!(resolve_client(&[&a]), Some(10));
    assert_eq!(resolve_client(&[&unassigned]), None);

    // the line holding the last day wins
    assert_eq!(resolve_client(&[&a, &b]), Some(20));
    assert_eq!(resolve_client(&[&b, &a]), Some(20));

    // nobody covers day 6 → unset
    assert_eq!(resolve_client(&[&a, &c]), None);
    assert_eq!(resolve_client(&[]), None);
}

#[test]
fn stored_record_version_increments_on_every_write() {
    let mut ctx = ledger("sync_version_bump", 1);
    SyncLogic::sync(&mut ctx, 1).expect("sync");

    let key = RecordKey::new(1, 3);
    let rec = OdometerLogic::register(&mut ctx, key, 100, Some(1)).expect("register");
    assert_eq!(rec.version, 2);

    let stored = ControlRecordRepo::new(&ctx.pool.conn)
        .require(&key)
        .expect("stored record");
    assert_eq!(stored, rec);
}
