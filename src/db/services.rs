use crate::db::repository::{Repository, bad_column};
use crate::errors::{AppError, AppResult};
use crate::models::service_event::{ServiceEvent, ServiceKind, ServiceStatus};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, week_id, vehicle_id, kind, status, unplanned,
                       scheduled_at, entered_at, exited_at, serviced";

pub struct ServiceEventRepo<'c> {
    conn: &'c Connection,
}

impl<'c> ServiceEventRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// The vehicle's not-yet-completed visit, whatever week opened it.
    pub fn open_for_vehicle(&self, vehicle_id: i64) -> AppResult<Option<ServiceEvent>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {COLUMNS} FROM service_events
             WHERE vehicle_id = ?1 AND status <> 'completed'
             ORDER BY id DESC
             LIMIT 1"
        ))?;
        Ok(stmt.query_row([vehicle_id], map_row).optional()?)
    }

    pub fn list_for_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<ServiceEvent>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {COLUMNS} FROM service_events WHERE vehicle_id = ?1 ORDER BY id ASC"
        ))?;
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
            .execute("DELETE FROM service_events WHERE week_id = ?1", [week_id])?)
    }
}

impl Repository for ServiceEventRepo<'_> {
    type Key = i64;
    type Entity = ServiceEvent;

    fn get(&self, id: &i64) -> AppResult<Option<ServiceEvent>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT {COLUMNS} FROM service_events WHERE id = ?1"))?;
        Ok(stmt.query_row([id], map_row).optional()?)
    }

    fn upsert(&self, ev: &ServiceEvent) -> AppResult<ServiceEvent> {
        let serviced = ServiceKind::list_to_db_str(&ev.serviced);

        if ev.id == 0 {
            self.conn.execute(
                "INSERT INTO service_events
                    (week_id, vehicle_id, kind, status, unplanned,
                     scheduled_at, entered_at, exited_at, serviced)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    ev.week_id,
                    ev.vehicle_id,
                    ev.kind.to_db_str(),
                    ev.status.to_db_str(),
                    ev.unplanned,
                    ev.scheduled_at,
                    ev.entered_at,
                    ev.exited_at,
                    serviced,
                ],
            )?;
            let mut stored = ev.clone();
            stored.id = self.conn.last_insert_rowid();
            return Ok(stored);
        }

        let changed = self.conn.execute(
            "UPDATE service_events
             SET kind = ?2, status = ?3, unplanned = ?4,
                 scheduled_at = ?5, entered_at = ?6, exited_at = ?7, serviced = ?8
             WHERE id = ?1",
            params![
                ev.id,
                ev.kind.to_db_str(),
                ev.status.to_db_str(),
                ev.unplanned,
                ev.scheduled_at,
                ev.entered_at,
                ev.exited_at,
                serviced,
            ],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("service event {}", ev.id)));
        }
        Ok(ev.clone())
    }

    fn delete(&self, id: &i64) -> AppResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM service_events WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    fn entity_name(&self) -> &'static str {
        "service event"
    }
}

fn map_row(row: &Row) -> rusqlite::Result<ServiceEvent> {
    let kind_str: String = row.get("kind")?;
    let kind =
        ServiceKind::from_db_str(&kind_str).ok_or_else(|| bad_column(3, "service kind", &kind_str))?;

    let status_str: String = row.get("status")?;
    let status = ServiceStatus::from_db_str(&status_str)
        .ok_or_else(|| bad_column(4, "service status", &status_str))?;

    let serviced_str: String = row.get("serviced")?;
    let serviced = ServiceKind::list_from_db_str(&serviced_str)
        .ok_or_else(|| bad_column(9, "serviced kinds", &serviced_str))?;

    Ok(ServiceEvent {
        id: row.get("id")?,
        week_id: row.get("week_id")?,
        vehicle_id: row.get("vehicle_id")?,
        kind,
        status,
        unplanned: row.get("unplanned")?,
        scheduled_at: row.get("scheduled_at")?,
        entered_at: row.get("entered_at")?,
        exited_at: row.get("exited_at")?,
        serviced,
    })
}
