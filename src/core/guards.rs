use crate::errors::{AppError, AppResult};
use crate::models::control_record::ControlRecord;

/// Optimistic check against the version the caller last read.
pub(crate) fn expect_version(rec: &ControlRecord, expected: Option<i64>) -> AppResult<()> {
    match expected {
        Some(v) if v != rec.version => Err(AppError::Conflict(format!(
            "control record {} is at version {}, caller holds {}; reload and retry",
            rec.key(),
            rec.version,
            v
        ))),
        _ => Ok(()),
    }
}

/// Closed records are frozen history.
pub(crate) fn ensure_open(rec: &ControlRecord) -> AppResult<()> {
    if rec.closed {
        return Err(AppError::StateConflict(format!(
            "control record {} belongs to a closed week",
            rec.key()
        )));
    }
    Ok(())
}
