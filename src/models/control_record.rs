use super::control_state::ControlState;
use serde::Serialize;
use std::fmt;

/// Unique key of a control record: one row per (week, vehicle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RecordKey {
    pub week_id: i64,
    pub vehicle_id: i64,
}

impl RecordKey {
    pub fn new(week_id: i64, vehicle_id: i64) -> Self {
        Self {
            week_id,
            vehicle_id,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} / vehicle {}", self.week_id, self.vehicle_id)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ControlRecord {
    pub week_id: i64,                 // ⇔ control_records.week_id
    pub vehicle_id: i64,              // ⇔ control_records.vehicle_id
    pub km_previous: i64,             // carried from the last known reading
    pub km_current: i64,              // 0 = not yet read
    pub state: ControlState,          // ⇔ control_records.state (snake_case tag)
    pub assigned_client: Option<i64>, // day-7 rule, may stay unset
    pub closed: bool,
    pub closed_at: Option<String>,
    pub version: i64, // 0 = not persisted yet
    pub created_at: String,
    pub updated_at: String,
}

impl ControlRecord {
    /// Fresh, unread record for a week; `version = 0` marks it for insertion.
    pub fn opened(
        key: RecordKey,
        km_previous: i64,
        state: ControlState,
        assigned_client: Option<i64>,
    ) -> Self {
        let now = chrono::Local::now().to_rfc3339();
        Self {
            week_id: key.week_id,
            vehicle_id: key.vehicle_id,
            km_previous,
            km_current: 0,
            state,
            assigned_client,
            closed: false,
            closed_at: None,
            version: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.week_id, self.vehicle_id)
    }

    pub fn is_read(&self) -> bool {
        self.km_current > 0
    }

    /// Best known odometer value: this week's reading, or the carried one.
    pub fn last_known_km(&self) -> i64 {
        if self.is_read() {
            self.km_current
        } else {
            self.km_previous
        }
    }

    /// Km driven this week (0 while unread).
    pub fn weekly_km(&self) -> i64 {
        if self.is_read() {
            self.km_current - self.km_previous
        } else {
            0
        }
    }
}
