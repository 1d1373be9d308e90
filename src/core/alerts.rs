//! Maintenance alerts, derived on every read and never stored.

use crate::models::alert::AlertSet;
use crate::models::control_record::ControlRecord;
use crate::models::maintenance_config::VehicleMaintenanceConfig;
use serde::Serialize;

pub struct MaintenanceAlertEngine;

/// Distance left before the next change; negative when overdue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub oil_km: Option<i64>,
    pub belt_km: Option<i64>,
}

impl MaintenanceAlertEngine {
    /// Alerts for a stored record. No config → no alerts.
    pub fn evaluate(rec: &ControlRecord, cfg: Option<&VehicleMaintenanceConfig>) -> AlertSet {
        match cfg {
            Some(cfg) => Self::evaluate_reading(rec.km_previous, rec.km_current, cfg),
            None => AlertSet::default(),
        }
    }

    /// Alerts for a reading that may not be persisted yet.
    pub fn evaluate_reading(
        km_previous: i64,
        km_current: i64,
        cfg: &VehicleMaintenanceConfig,
    ) -> AlertSet {
        if km_current <= 0 {
            return AlertSet::default();
        }

        AlertSet {
            oil: km_current - cfg.last_oil_change_km >= cfg.oil_interval_km,
            belt: cfg.has_belt && km_current - cfg.last_belt_change_km >= cfg.belt_interval_km,
            overage: km_current - km_previous > cfg.weekly_km_allowance,
        }
    }

    pub fn remaining(rec: &ControlRecord, cfg: Option<&VehicleMaintenanceConfig>) -> Remaining {
        let Some(cfg) = cfg else {
            return Remaining::default();
        };
        if !rec.is_read() {
            return Remaining::default();
        }

        Remaining {
            oil_km: Some(cfg.last_oil_change_km + cfg.oil_interval_km - rec.km_current),
            belt_km: cfg
                .has_belt
                .then(|| cfg.last_belt_change_km + cfg.belt_interval_km - rec.km_current),
        }
    }
}
