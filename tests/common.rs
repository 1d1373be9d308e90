#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use fleetledger::core::context::LedgerContext;
use fleetledger::core::import::{GridSnapshot, ImportLogic};
use fleetledger::models::vehicle::Vehicle;
use fleetledger::models::week::{AssignmentLine, Week};
use std::env;
use std::fs;
use std::path::PathBuf;

/// CLI command isolated from the user's real config directory.
pub fn fl() -> Command {
    let mut cmd = cargo_bin_cmd!("fleetledger");
    let home = env::temp_dir().join("fleetledger_test_home");
    fs::create_dir_all(&home).ok();
    cmd.env("FLEETLEDGER_HOME", home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fleetledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn line(vehicle_id: i64, client_id: Option<i64>, days: &[u8]) -> AssignmentLine {
    AssignmentLine {
        vehicle_id,
        client_id,
        selected_days: days.to_vec(),
    }
}

/// Weeks 1..=n starting Monday 2025-03-03; vehicle 1 → client 10 and
/// vehicle 2 → client 20 for the whole week, vehicle 3 active but unassigned.
pub fn sample_snapshot(weeks: i64) -> GridSnapshot {
    let vehicles = vec![
        Vehicle { id: 1, plate: "AB-123-CD".into(), active: true },
        Vehicle { id: 2, plate: "EF-456-GH".into(), active: true },
        Vehicle { id: 3, plate: "IJ-789-KL".into(), active: true },
        Vehicle { id: 4, plate: "OLD-000".into(), active: false },
    ];

    let first = date("2025-03-03");
    let weeks = (1..=weeks)
        .map(|i| {
            let start = first + chrono::Duration::days(7 * (i - 1));
            Week {
                id: i,
                start_date: start,
                end_date: start + chrono::Duration::days(6),
                lines: vec![
                    line(1, Some(10), &[0, 1, 2, 3, 4, 5, 6]),
                    line(2, Some(20), &[0, 1, 2, 3, 4, 5, 6]),
                ],
            }
        })
        .collect();

    GridSnapshot { vehicles, weeks }
}

/// Library context over a fresh database loaded with `sample_snapshot`.
pub fn ledger(name: &str, weeks: i64) -> LedgerContext {
    let db_path = setup_test_db(name);
    let mut ctx = LedgerContext::open(&db_path, "tester").expect("open ledger");
    ImportLogic::import(&mut ctx, &sample_snapshot(weeks)).expect("import snapshot");
    ctx
}

/// Write `sample_snapshot` as JSON and return its path.
pub fn snapshot_file(name: &str, weeks: i64) -> String {
    let path = temp_out(name, "json");
    let json = serde_json::to_string_pretty(&sample_snapshot(weeks)).expect("serialize snapshot");
    fs::write(&path, json).expect("write snapshot");
    path
}

/// Init a DB through the CLI and import `weeks` grid weeks into it.
pub fn init_db_with_grid(db_path: &str, weeks: i64) {
    fl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    let snap = snapshot_file(&format!("{}_grid", db_path.replace(['/', '\\', ':', '.'], "_")), weeks);
    fl().args(["--db", db_path, "import", "--file", &snap])
        .assert()
        .success();
}
