use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Per-vehicle maintenance thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleMaintenanceConfig {
    pub vehicle_id: i64,
    pub oil_interval_km: i64,
    pub last_oil_change_km: i64,
    pub has_belt: bool,
    pub belt_interval_km: i64,
    pub last_belt_change_km: i64,
    pub weekly_km_allowance: i64,
    pub updated_at: String,
}

/// Partial update; `None` keeps the stored (or default) value.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub oil_interval_km: Option<i64>,
    pub last_oil_change_km: Option<i64>,
    pub has_belt: Option<bool>,
    pub belt_interval_km: Option<i64>,
    pub last_belt_change_km: Option<i64>,
    pub weekly_km_allowance: Option<i64>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.oil_interval_km.is_none()
            && self.last_oil_change_km.is_none()
            && self.has_belt.is_none()
            && self.belt_interval_km.is_none()
            && self.last_belt_change_km.is_none()
            && self.weekly_km_allowance.is_none()
    }
}

impl VehicleMaintenanceConfig {
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.oil_interval_km {
            self.oil_interval_km = v;
        }
        if let Some(v) = patch.last_oil_change_km {
            self.last_oil_change_km = v;
        }
        if let Some(v) = patch.has_belt {
            self.has_belt = v;
        }
        if let Some(v) = patch.belt_interval_km {
            self.belt_interval_km = v;
        }
        if let Some(v) = patch.last_belt_change_km {
            self.last_belt_change_km = v;
        }
        if let Some(v) = patch.weekly_km_allowance {
            self.weekly_km_allowance = v;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("oil interval", self.oil_interval_km),
            ("last oil change", self.last_oil_change_km),
            ("belt interval", self.belt_interval_km),
            ("last belt change", self.last_belt_change_km),
            ("weekly allowance", self.weekly_km_allowance),
        ];
        if let Some((name, v)) = fields.iter().find(|(_, v)| *v < 0) {
            return Err(AppError::Validation(format!(
                "{} must not be negative (got {})",
                name, v
            )));
        }
        if self.oil_interval_km == 0 {
            return Err(AppError::Validation("oil interval must be > 0".into()));
        }
        if self.has_belt && self.belt_interval_km == 0 {
            return Err(AppError::Validation(
                "belt interval must be > 0 when the vehicle has a belt".into(),
            ));
        }
        Ok(())
    }
}
