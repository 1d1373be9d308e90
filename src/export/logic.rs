use crate::core::alerts::MaintenanceAlertEngine;
use crate::db::configs::MaintenanceConfigRepo;
use crate::db::log::ttlog;
use crate::db::grid::VehicleRepo;
use crate::db::records::ControlRecordRepo;
use crate::db::repository::Repository;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::prepare_output;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::RecordExport;
use crate::export::range::WeekRange;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use rusqlite::Connection;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export control records (with derived alerts) for the selected weeks.
    ///
    /// `range`: `None` or `"all"` for everything, `"N"` for one week,
    /// `"N:M"` for an inclusive interval.
    /// Returns how many rows were written.
    pub fn export(
        conn: &Connection,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        let bounds = match range {
            None => None,
            Some(r) => WeekRange::parse(r)?,
        };

        prepare_output(path, force)?;

        let rows = load_records(conn, bounds)?;
        if rows.is_empty() {
            warning("No control records found for selected range.");
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, path)?,
        }

        ttlog(
            conn,
            "export",
            file,
            &format!("{} record(s) as {}", rows.len(), format.as_str()),
        )?;

        Ok(rows.len())
    }
}

fn load_records(conn: &Connection, bounds: Option<WeekRange>) -> AppResult<Vec<RecordExport>> {
    let records = ControlRecordRepo::new(conn);
    let configs = MaintenanceConfigRepo::new(conn).all_by_vehicle()?;
    let vehicles = VehicleRepo::new(conn);

    let mut weeks: Vec<i64> = records.counts_by_week()?.into_keys().collect();
    weeks.sort_unstable();

    let mut out = Vec::new();
    for week_id in weeks {
        if let Some(b) = bounds
            && !b.contains(week_id)
        {
            continue;
        }

        for rec in records.list_for_week(week_id)? {
            let alerts = MaintenanceAlertEngine::evaluate(&rec, configs.get(&rec.vehicle_id));
            let plate = vehicles
                .get(&rec.vehicle_id)?
                .map(|v| v.plate)
                .unwrap_or_default();

            out.push(RecordExport {
                week_id: rec.week_id,
                vehicle_id: rec.vehicle_id,
                plate,
                client_id: rec.assigned_client,
                km_previous: rec.km_previous,
                km_current: rec.km_current,
                weekly_km: rec.weekly_km(),
                state: rec.state.to_db_str().to_string(),
                alerts: alerts.tags(),
                closed: rec.closed,
                closed_at: rec.closed_at.clone(),
                version: rec.version,
                updated_at: rec.updated_at.clone(),
            });
        }
    }

    Ok(out)
}
