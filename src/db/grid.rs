//! SQLite-backed views of the scheduling grid and the vehicle catalog.
//!
//! The grid module of the back office publishes into these tables (see
//! `core::import`); the ledger only reads them through the ports.

use crate::core::ports::{SchedulingGrid, VehicleCatalog};
use crate::db::repository::{Repository, bad_column};
use crate::errors::AppResult;
use crate::models::vehicle::Vehicle;
use crate::models::week::{AssignmentLine, Week};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub struct WeekRepo<'c> {
    conn: &'c Connection,
}

impl<'c> WeekRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn lines(&self, week_id: i64) -> AppResult<Vec<AssignmentLine>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT vehicle_id, client_id, selected_days
             FROM week_lines
             WHERE week_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([week_id], |row| {
            let days_str: String = row.get(2)?;
            let selected_days = AssignmentLine::days_from_db_str(&days_str)
                .ok_or_else(|| bad_column(2, "selected days", &days_str))?;
            Ok(AssignmentLine {
                vehicle_id: row.get(0)?,
                client_id: row.get(1)?,
                selected_days,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Weeks in ascending id order, without lines.
    pub fn list(&self) -> AppResult<Vec<Week>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, start_date, end_date FROM weeks ORDER BY id ASC")?;
        let rows = stmt.query_map([], map_week_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

impl Repository for WeekRepo<'_> {
    type Key = i64;
    type Entity = Week;

    fn get(&self, week_id: &i64) -> AppResult<Option<Week>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, start_date, end_date FROM weeks WHERE id = ?1")?;
        let week = stmt.query_row([week_id], map_week_row).optional()?;

        match week {
            None => Ok(None),
            Some(mut w) => {
                w.lines = self.lines(w.id)?;
                Ok(Some(w))
            }
        }
    }

    /// Replaces the week's lines wholesale: the grid snapshot is authoritative.
    fn upsert(&self, week: &Week) -> AppResult<Week> {
        self.conn.execute(
            "INSERT INTO weeks (id, start_date, end_date) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                start_date = excluded.start_date,
                end_date = excluded.end_date",
            params![
                week.id,
                week.start_date.format("%Y-%m-%d").to_string(),
                week.end_date.format("%Y-%m-%d").to_string(),
            ],
        )?;

        self.conn
            .execute("DELETE FROM week_lines WHERE week_id = ?1", [week.id])?;

        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO week_lines (week_id, vehicle_id, client_id, selected_days)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for line in &week.lines {
            stmt.execute(params![
                week.id,
                line.vehicle_id,
                line.client_id,
                line.days_to_db_str()
            ])?;
        }

        Ok(week.clone())
    }

    fn delete(&self, week_id: &i64) -> AppResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM weeks WHERE id = ?1", [week_id])?;
        Ok(n > 0)
    }

    fn entity_name(&self) -> &'static str {
        "week"
    }
}

impl SchedulingGrid for WeekRepo<'_> {
    fn week(&self, week_id: i64) -> AppResult<Option<Week>> {
        self.get(&week_id)
    }

    fn weeks(&self) -> AppResult<Vec<Week>> {
        self.list()
    }
}

fn map_week_row(row: &Row) -> rusqlite::Result<Week> {
    let start_str: String = row.get(1)?;
    let end_str: String = row.get(2)?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d")
        .map_err(|_| bad_column(1, "start date", &start_str))?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d")
        .map_err(|_| bad_column(2, "end date", &end_str))?;

    Ok(Week {
        id: row.get(0)?,
        start_date,
        end_date,
        lines: Vec::new(),
    })
}

pub struct VehicleRepo<'c> {
    conn: &'c Connection,
}

impl<'c> VehicleRepo<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Repository for VehicleRepo<'_> {
    type Key = i64;
    type Entity = Vehicle;

    fn get(&self, id: &i64) -> AppResult<Option<Vehicle>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, plate, active FROM vehicles WHERE id = ?1")?;
        Ok(stmt.query_row([id], map_vehicle_row).optional()?)
    }

    fn upsert(&self, v: &Vehicle) -> AppResult<Vehicle> {
        self.conn.execute(
            "INSERT INTO vehicles (id, plate, active) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET plate = excluded.plate, active = excluded.active",
            params![v.id, v.plate, v.active],
        )?;
        Ok(v.clone())
    }

    fn delete(&self, id: &i64) -> AppResult<bool> {
        let n = self.conn.execute("DELETE FROM vehicles WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    fn entity_name(&self) -> &'static str {
        "vehicle"
    }
}

impl VehicleCatalog for VehicleRepo<'_> {
    fn active_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, plate, active FROM vehicles WHERE active = 1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], map_vehicle_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

fn map_vehicle_row(row: &Row) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        plate: row.get(1)?,
        active: row.get(2)?,
    })
}
