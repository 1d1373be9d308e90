use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It also records applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Tables published by the scheduling grid and the vehicle catalog.
fn create_grid_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            id      INTEGER PRIMARY KEY,
            plate   TEXT NOT NULL,
            active  INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS weeks (
            id          INTEGER PRIMARY KEY,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS week_lines (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            week_id        INTEGER NOT NULL REFERENCES weeks(id) ON DELETE CASCADE,
            vehicle_id     INTEGER NOT NULL,
            client_id      INTEGER,
            selected_days  TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_week_lines_week ON week_lines(week_id, vehicle_id);
        "#,
    )?;
    Ok(())
}

/// Ledger tables: configs, control records, service events, odometer history.
fn create_ledger_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS maintenance_configs (
            vehicle_id           INTEGER PRIMARY KEY,
            oil_interval_km      INTEGER NOT NULL,
            last_oil_change_km   INTEGER NOT NULL DEFAULT 0,
            has_belt             INTEGER NOT NULL DEFAULT 0,
            belt_interval_km     INTEGER NOT NULL DEFAULT 0,
            last_belt_change_km  INTEGER NOT NULL DEFAULT 0,
            weekly_km_allowance  INTEGER NOT NULL,
            updated_at           TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS control_records (
            week_id          INTEGER NOT NULL,
            vehicle_id       INTEGER NOT NULL,
            km_previous      INTEGER NOT NULL DEFAULT 0,
            km_current       INTEGER NOT NULL DEFAULT 0,
            state            TEXT NOT NULL CHECK(state IN
                               ('request_pending','normal','needs_scheduling','scheduled','in_service')),
            assigned_client  INTEGER,
            closed           INTEGER NOT NULL DEFAULT 0,
            closed_at        TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL,
            PRIMARY KEY (week_id, vehicle_id),
            CHECK (km_current = 0 OR km_current >= km_previous)
        );

        CREATE INDEX IF NOT EXISTS idx_control_records_vehicle
            ON control_records(vehicle_id, week_id);

        CREATE TABLE IF NOT EXISTS service_events (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            week_id       INTEGER NOT NULL,
            vehicle_id    INTEGER NOT NULL,
            kind          TEXT NOT NULL CHECK(kind IN ('oil','belt','other')),
            status        TEXT NOT NULL CHECK(status IN ('scheduled','in_progress','completed')),
            unplanned     INTEGER NOT NULL DEFAULT 0,
            scheduled_at  TEXT,
            entered_at    TEXT,
            exited_at     TEXT,
            serviced      TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (week_id, vehicle_id) REFERENCES control_records(week_id, vehicle_id)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_service_events_open_vehicle
            ON service_events(vehicle_id) WHERE status <> 'completed';

        CREATE TABLE IF NOT EXISTS km_history (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            week_id      INTEGER NOT NULL,
            vehicle_id   INTEGER NOT NULL,
            km           INTEGER NOT NULL,
            recorded_at  TEXT NOT NULL,
            operator     TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (week_id, vehicle_id) REFERENCES control_records(week_id, vehicle_id)
        );

        CREATE INDEX IF NOT EXISTS idx_km_history_vehicle ON km_history(vehicle_id, id);
        "#,
    )?;
    Ok(())
}

/// Optimistic-concurrency token on control records.
fn add_record_version(conn: &Connection) -> Result<()> {
    if table_has_column(conn, "control_records", "version")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE control_records ADD COLUMN version INTEGER NOT NULL DEFAULT 1",
        [],
    )?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

type MigrationFn = fn(&Connection) -> Result<()>;

/// Ordered schema history. Versions are never renamed or reordered.
const MIGRATIONS: &[(&str, &str, MigrationFn)] = &[
    (
        "20250301_0001_create_grid_tables",
        "Created vehicles, weeks and week_lines tables",
        create_grid_tables,
    ),
    (
        "20250301_0002_create_ledger_tables",
        "Created maintenance, control, service and km history tables",
        create_ledger_tables,
    ),
    (
        "20250412_0003_add_record_version",
        "Added version column to control_records",
        add_record_version,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
/// Each migration commits together with its `migration_applied` marker.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        apply(&tx).map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, 'migration_applied', ?2, ?3)",
            rusqlite::params![chrono::Local::now().to_rfc3339(), version, message],
        )?;
        tx.commit()?;

        success(format!("Migration applied: {}", version));
    }

    Ok(())
}
