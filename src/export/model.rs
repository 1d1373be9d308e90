use serde::Serialize;

/// Flat control-record row shared by every export format.
#[derive(Serialize, Clone, Debug)]
pub struct RecordExport {
    pub week_id: i64,
    pub vehicle_id: i64,
    pub plate: String,
    pub client_id: Option<i64>,
    pub km_previous: i64,
    pub km_current: i64,
    pub weekly_km: i64,
    pub state: String,
    pub alerts: String,
    pub closed: bool,
    pub closed_at: Option<String>,
    pub version: i64,
    pub updated_at: String,
}

pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "week_id",
        "vehicle_id",
        "plate",
        "client_id",
        "km_previous",
        "km_current",
        "weekly_km",
        "state",
        "alerts",
        "closed",
        "closed_at",
        "version",
        "updated_at",
    ]
}

pub(crate) fn record_to_row(r: &RecordExport) -> Vec<String> {
    vec![
        r.week_id.to_string(),
        r.vehicle_id.to_string(),
        r.plate.clone(),
        r.client_id.map(|c| c.to_string()).unwrap_or_default(),
        r.km_previous.to_string(),
        r.km_current.to_string(),
        r.weekly_km.to_string(),
        r.state.clone(),
        r.alerts.clone(),
        r.closed.to_string(),
        r.closed_at.clone().unwrap_or_default(),
        r.version.to_string(),
        r.updated_at.clone(),
    ]
}
