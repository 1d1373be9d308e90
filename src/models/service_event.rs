use super::control_record::RecordKey;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Oil,
    Belt,
    Other,
}

impl ServiceKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ServiceKind::Oil => "oil",
            ServiceKind::Belt => "belt",
            ServiceKind::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "oil" => Some(ServiceKind::Oil),
            "belt" => Some(ServiceKind::Belt),
            "other" => Some(ServiceKind::Other),
            _ => None,
        }
    }

    pub fn list_to_db_str(kinds: &[ServiceKind]) -> String {
        kinds
            .iter()
            .map(|k| k.to_db_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn list_from_db_str(s: &str) -> Option<Vec<ServiceKind>> {
        if s.is_empty() {
            return Some(Vec::new());
        }
        s.split(',').map(ServiceKind::from_db_str).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl ServiceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ServiceStatus::Scheduled => "scheduled",
            ServiceStatus::InProgress => "in_progress",
            ServiceStatus::Completed => "completed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(ServiceStatus::Scheduled),
            "in_progress" => Some(ServiceStatus::InProgress),
            "completed" => Some(ServiceStatus::Completed),
            _ => None,
        }
    }
}

/// One shop visit. Created against the record of the week it was opened in;
/// it may be completed from a later week's record of the same vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEvent {
    pub id: i64, // 0 = not persisted yet
    pub week_id: i64,
    pub vehicle_id: i64,
    pub kind: ServiceKind,
    pub status: ServiceStatus,
    pub unplanned: bool,
    pub scheduled_at: Option<String>,
    pub entered_at: Option<String>,
    pub exited_at: Option<String>,
    pub serviced: Vec<ServiceKind>, // filled on exit
}

impl ServiceEvent {
    pub fn scheduled(key: RecordKey, kind: ServiceKind, now: &str) -> Self {
        Self {
            id: 0,
            week_id: key.week_id,
            vehicle_id: key.vehicle_id,
            kind,
            status: ServiceStatus::Scheduled,
            unplanned: false,
            scheduled_at: Some(now.to_string()),
            entered_at: None,
            exited_at: None,
            serviced: Vec::new(),
        }
    }

    pub fn unplanned(key: RecordKey, kind: ServiceKind, now: &str) -> Self {
        Self {
            id: 0,
            week_id: key.week_id,
            vehicle_id: key.vehicle_id,
            kind,
            status: ServiceStatus::InProgress,
            unplanned: true,
            scheduled_at: None,
            entered_at: Some(now.to_string()),
            exited_at: None,
            serviced: Vec::new(),
        }
    }

    pub fn record_key(&self) -> RecordKey {
        RecordKey::new(self.week_id, self.vehicle_id)
    }
}
