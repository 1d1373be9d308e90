//! Loads a scheduling-grid snapshot (vehicles plus weeks with lines) into the
//! tenant database so the ledger can read it through its ports.

use crate::core::context::LedgerContext;
use crate::db::grid::{VehicleRepo, WeekRepo};
use crate::db::log::ttlog;
use crate::db::repository::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::vehicle::Vehicle;
use crate::models::week::Week;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridSnapshot {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub vehicles: usize,
    pub weeks: usize,
    pub lines: usize,
}

pub struct ImportLogic;

impl ImportLogic {
    pub fn import_file(ctx: &mut LedgerContext, path: &Path) -> AppResult<ImportReport> {
        let raw = fs::read_to_string(path)?;
        let snapshot: GridSnapshot = serde_json::from_str(&raw)?;
        Self::import(ctx, &snapshot)
    }

    /// All or nothing: a bad week rejects the whole snapshot.
    pub fn import(ctx: &mut LedgerContext, snapshot: &GridSnapshot) -> AppResult<ImportReport> {
        let tx = ctx.pool.conn.transaction()?;
        let report = {
            let vehicles = VehicleRepo::new(&tx);
            let weeks = WeekRepo::new(&tx);

            for v in &snapshot.vehicles {
                if v.plate.trim().is_empty() {
                    return Err(AppError::Validation(format!("vehicle {} has an empty plate", v.id)));
                }
                vehicles.upsert(v)?;
            }

            let mut seen = HashSet::new();
            let mut lines = 0;
            for w in &snapshot.weeks {
                if !seen.insert(w.id) {
                    return Err(AppError::Validation(format!("week {} appears twice", w.id)));
                }
                w.validate()?;
                for line in &w.lines {
                    vehicles.require(&line.vehicle_id)?;
                }
                weeks.upsert(w)?;
                lines += w.lines.len();
            }

            let report = ImportReport {
                vehicles: snapshot.vehicles.len(),
                weeks: snapshot.weeks.len(),
                lines,
            };
            ttlog(
                &tx,
                "import",
                "grid",
                &format!(
                    "{} vehicle(s), {} week(s), {} line(s) by {}",
                    report.vehicles, report.weeks, report.lines, ctx.operator
                ),
            )?;
            report
        };
        tx.commit()?;
        Ok(report)
    }
}
