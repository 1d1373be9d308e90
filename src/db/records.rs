use crate::db::repository::{Repository, bad_column};
use crate::errors::{AppError, AppResult};
use crate::models::control_record::{ControlRecord, RecordKey};
use crate::models::control_state::ControlState;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;

const COLUMNS: &str = "week_id, vehicle_id, km_previous, km_current, state, assigned_client,
                       closed, closed_at, version, created_at, updated_at";

pub struct ControlRecordRepo<'c> {
    conn: &'c Connection,
}

impl<'c> ControlRecordRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn list_for_week(&self, week_id: i64) -> AppResult<Vec<ControlRecord>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {COLUMNS} FROM control_records WHERE week_id = ?1 ORDER BY vehicle_id ASC"
        ))?;
        let rows = stmt.query_map([week_id], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Most recent record of `vehicle_id` in any week strictly before `week_id`.
    pub fn latest_before(&self, vehicle_id: i64, week_id: i64) -> AppResult<Option<ControlRecord>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {COLUMNS} FROM control_records
             WHERE vehicle_id = ?1 AND week_id < ?2
             ORDER BY week_id DESC
             LIMIT 1"
        ))?;
        Ok(stmt
            .query_row(params![vehicle_id, week_id], map_row)
            .optional()?)
    }

    /// Highest week id that owns at least one record.
    pub fn last_week_with_records(&self) -> AppResult<Option<i64>> {
        Ok(self
            .conn
            .query_row("SELECT MAX(week_id) FROM control_records", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?)
    }

    /// (total, closed) record counts per week.
    pub fn counts_by_week(&self) -> AppResult<HashMap<i64, (i64, i64)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT week_id, COUNT(*), COALESCE(SUM(closed), 0)
             FROM control_records
             GROUP BY week_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                (row.get::<_, i64>(1)?, row.get::<_, i64>(2)?),
            ))
        })?;

        let mut out = HashMap::new();
        for r in rows {
            let (week, counts) = r?;
            out.insert(week, counts);
        }
        Ok(out)
    }

    /// Freeze every open record of the week. Returns how many were closed now.
    pub fn close_week(&self, week_id: i64, now: &str) -> AppResult<usize> {
        Ok(self.conn.execute(
            "UPDATE control_records
             SET closed = 1, closed_at = ?2, updated_at = ?2, version = version + 1
             WHERE week_id = ?1 AND closed = 0",
            params![week_id, now],
        )?)
    }

    pub fn delete_week(&self, week_id: i64) -> AppResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM control_records WHERE week_id = ?1", [week_id])?)
    }

    fn insert(&self, rec: &ControlRecord) -> AppResult<ControlRecord> {
        self.conn.execute(
            "INSERT INTO control_records
                (week_id, vehicle_id, km_previous, km_current, state, assigned_client,
                 closed, closed_at, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10)",
            params![
                rec.week_id,
                rec.vehicle_id,
                rec.km_previous,
                rec.km_current,
                rec.state.to_db_str(),
                rec.assigned_client,
                rec.closed,
                rec.closed_at,
                rec.created_at,
                rec.updated_at,
            ],
        )?;
        let mut stored = rec.clone();
        stored.version = 1;
        Ok(stored)
    }

    /// Compare-and-swap on `version`: a stale copy never overwrites a newer row.
    fn update(&self, rec: &ControlRecord) -> AppResult<ControlRecord> {
        let now = chrono::Local::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE control_records
             SET km_previous = ?3, km_current = ?4, state = ?5, assigned_client = ?6,
                 closed = ?7, closed_at = ?8, updated_at = ?9, version = version + 1
             WHERE week_id = ?1 AND vehicle_id = ?2 AND version = ?10",
            params![
                rec.week_id,
                rec.vehicle_id,
                rec.km_previous,
                rec.km_current,
                rec.state.to_db_str(),
                rec.assigned_client,
                rec.closed,
                rec.closed_at,
                now,
                rec.version,
            ],
        )?;

        if changed == 0 {
            return match self.get(&rec.key())? {
                None => Err(AppError::NotFound(format!("control record {}", rec.key()))),
                Some(current) => Err(AppError::Conflict(format!(
                    "control record {} was modified concurrently (version {} expected, {} stored); reload and retry",
                    rec.key(),
                    rec.version,
                    current.version
                ))),
            };
        }

        let mut stored = rec.clone();
        stored.version += 1;
        stored.updated_at = now;
        Ok(stored)
    }
}

impl Repository for ControlRecordRepo<'_> {
    type Key = RecordKey;
    type Entity = ControlRecord;

    fn get(&self, key: &RecordKey) -> AppResult<Option<ControlRecord>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {COLUMNS} FROM control_records WHERE week_id = ?1 AND vehicle_id = ?2"
        ))?;
        Ok(stmt
            .query_row(params![key.week_id, key.vehicle_id], map_row)
            .optional()?)
    }

    fn upsert(&self, rec: &ControlRecord) -> AppResult<ControlRecord> {
        if rec.km_current > 0 && rec.km_current < rec.km_previous {
            return Err(AppError::InvariantViolation(format!(
                "control record {}: current km {} below previous km {}",
                rec.key(),
                rec.km_current,
                rec.km_previous
            )));
        }
        if rec.version == 0 {
            self.insert(rec)
        } else {
            self.update(rec)
        }
    }

    fn delete(&self, key: &RecordKey) -> AppResult<bool> {
        let n = self.conn.execute(
            "DELETE FROM control_records WHERE week_id = ?1 AND vehicle_id = ?2",
            params![key.week_id, key.vehicle_id],
        )?;
        Ok(n > 0)
    }

    fn entity_name(&self) -> &'static str {
        "control record"
    }
}

fn map_row(row: &Row) -> rusqlite::Result<ControlRecord> {
    let state_str: String = row.get("state")?;
    let state = ControlState::from_db_str(&state_str)
        .ok_or_else(|| bad_column(4, "control state", &state_str))?;

    Ok(ControlRecord {
        week_id: row.get("week_id")?,
        vehicle_id: row.get("vehicle_id")?,
        km_previous: row.get("km_previous")?,
        km_current: row.get("km_current")?,
        state,
        assigned_client: row.get("assigned_client")?,
        closed: row.get("closed")?,
        closed_at: row.get("closed_at")?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
