use serde::Serialize;

/// One odometer reading, as registered. Rows are only ever appended.
#[derive(Debug, Clone, Serialize)]
pub struct KmHistoryEntry {
    pub id: i64,
    pub week_id: i64,
    pub vehicle_id: i64,
    pub km: i64,
    pub recorded_at: String, // ISO8601
    pub operator: String,
}
