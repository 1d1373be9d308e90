use crate::errors::AppResult;
use crate::models::control_record::RecordKey;
use crate::models::km_history::KmHistoryEntry;
use rusqlite::{Connection, Row, params};

/// Append-only odometer audit. Rows leave only with their week.
pub struct KmHistoryRepo<'c> {
    conn: &'c Connection,
}

impl<'c> KmHistoryRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn append(
        &self,
        key: RecordKey,
        km: i64,
        recorded_at: &str,
        operator: &str,
    ) -> AppResult<KmHistoryEntry> {
        self.conn.execute(
            "INSERT INTO km_history (week_id, vehicle_id, km, recorded_at, operator)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![key.week_id, key.vehicle_id, km, recorded_at, operator],
        )?;

        Ok(KmHistoryEntry {
            id: self.conn.last_insert_rowid(),
            week_id: key.week_id,
            vehicle_id: key.vehicle_id,
            km,
            recorded_at: recorded_at.to_string(),
            operator: operator.to_string(),
        })
    }

    pub fn list_for_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<KmHistoryEntry>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, week_id, vehicle_id, km, recorded_at, operator
             FROM km_history
             WHERE vehicle_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([vehicle_id], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn delete_week(&self, week_id: i64) -> AppResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM km_history WHERE week_id = ?1", [week_id])?)
    }
}

fn map_row(row: &Row) -> rusqlite::Result<KmHistoryEntry> {
    Ok(KmHistoryEntry {
        id: row.get(0)?,
        week_id: row.get(1)?,
        vehicle_id: row.get(2)?,
        km: row.get(3)?,
        recorded_at: row.get(4)?,
        operator: row.get(5)?,
    })
}
