use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index of the last day of the 7-day operational cycle.
pub const LAST_DAY: u8 = 6;

/// An operational week as published by the scheduling grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub id: i64,
    pub start_date: NaiveDate, // ⇔ weeks.start_date (TEXT "YYYY-MM-DD")
    pub end_date: NaiveDate,   // ⇔ weeks.end_date
    #[serde(default)]
    pub lines: Vec<AssignmentLine>,
}

/// One vehicle → client assignment inside a week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentLine {
    pub vehicle_id: i64,
    pub client_id: Option<i64>,
    #[serde(default)]
    pub selected_days: Vec<u8>, // subset of 0..=6
}

impl AssignmentLine {
    pub fn covers(&self, day: u8) -> bool {
        self.selected_days.contains(&day)
    }

    /// Days as stored in `week_lines.selected_days` ("0,1,6").
    pub fn days_to_db_str(&self) -> String {
        let mut days = self.selected_days.clone();
        days.sort_unstable();
        days.dedup();
        days.iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn days_from_db_str(s: &str) -> Option<Vec<u8>> {
        if s.trim().is_empty() {
            return Some(Vec::new());
        }
        s.split(',')
            .map(|p| p.trim().parse::<u8>().ok().filter(|d| *d <= LAST_DAY))
            .collect()
    }
}

impl Week {
    pub fn lines_for(&self, vehicle_id: i64) -> Vec<&AssignmentLine> {
        self.lines
            .iter()
            .filter(|l| l.vehicle_id == vehicle_id)
            .collect()
    }

    /// Reject snapshots the grid should never have produced.
    pub fn validate(&self) -> AppResult<()> {
        if self.end_date < self.start_date {
            return Err(AppError::Validation(format!(
                "week {}: end date {} precedes start date {}",
                self.id, self.end_date, self.start_date
            )));
        }
        for line in &self.lines {
            if let Some(bad) = line.selected_days.iter().find(|d| **d > LAST_DAY) {
                return Err(AppError::Validation(format!(
                    "week {}: vehicle {} has day index {} outside 0..={}",
                    self.id, line.vehicle_id, bad, LAST_DAY
                )));
            }
        }
        Ok(())
    }
}

/// Derived control status of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    Pending, // no control records yet
    Open,    // some record not closed
    Closed,  // every record closed
}

impl WeekStatus {
    pub fn from_counts(total: i64, closed: i64) -> Self {
        if total == 0 {
            WeekStatus::Pending
        } else if closed < total {
            WeekStatus::Open
        } else {
            WeekStatus::Closed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStatus::Pending => "pending",
            WeekStatus::Open => "open",
            WeekStatus::Closed => "closed",
        }
    }
}

/// A grid week joined with its ledger status.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSummary {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub records: i64,
    pub status: WeekStatus,
}
