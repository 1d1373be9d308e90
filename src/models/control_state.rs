use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Workflow state of a control record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    RequestPending,  // waiting for the week's odometer reading
    Normal,          // read, nothing due
    NeedsScheduling, // read, oil or belt change due
    Scheduled,       // shop visit booked
    InService,       // vehicle in the shop
}

/// Every way a record's state can be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    RegisterOdometer,
    Schedule,
    EnterShop,
    Unplanned,
    ExitShop,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::RegisterOdometer => "register odometer",
            Transition::Schedule => "schedule service",
            Transition::EnterShop => "enter shop",
            Transition::Unplanned => "request unplanned service",
            Transition::ExitShop => "exit shop",
        }
    }
}

impl ControlState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ControlState::RequestPending => "request_pending",
            ControlState::Normal => "normal",
            ControlState::NeedsScheduling => "needs_scheduling",
            ControlState::Scheduled => "scheduled",
            ControlState::InService => "in_service",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "request_pending" => Some(ControlState::RequestPending),
            "normal" => Some(ControlState::Normal),
            "needs_scheduling" => Some(ControlState::NeedsScheduling),
            "scheduled" => Some(ControlState::Scheduled),
            "in_service" => Some(ControlState::InService),
            _ => None,
        }
    }

    /// State after a reading or a shop exit, given whether a change is due.
    pub fn after_reading(change_due: bool) -> Self {
        if change_due {
            ControlState::NeedsScheduling
        } else {
            ControlState::Normal
        }
    }

    /// The transition table. Every state change is validated here.
    pub fn allows(&self, t: Transition) -> bool {
        use ControlState::*;
        match t {
            Transition::RegisterOdometer => {
                matches!(self, RequestPending | Normal | NeedsScheduling)
            }
            Transition::Schedule => matches!(self, Normal | NeedsScheduling),
            // the booked visit may sit on an earlier week's record
            Transition::EnterShop => !matches!(self, InService),
            Transition::Unplanned => !matches!(self, InService),
            Transition::ExitShop => matches!(self, InService),
        }
    }

    pub fn check(&self, t: Transition) -> AppResult<()> {
        if self.allows(t) {
            Ok(())
        } else {
            Err(AppError::StateConflict(format!(
                "cannot {} while record is '{}'",
                t.name(),
                self
            )))
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlState::RequestPending => "Request reading",
            ControlState::Normal => "Normal",
            ControlState::NeedsScheduling => "Needs scheduling",
            ControlState::Scheduled => "Scheduled",
            ControlState::InService => "In service",
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
