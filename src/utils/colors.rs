//! ANSI color helpers for terminal output.

use crate::models::control_state::ControlState;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

pub fn color_for_state(state: ControlState) -> &'static str {
    match state {
        ControlState::RequestPending => GREY,
        ControlState::Normal => GREEN,
        ControlState::NeedsScheduling => RED,
        ControlState::Scheduled => YELLOW,
        ControlState::InService => MAGENTA,
    }
}

/// Remaining km before a change: red when overdue, yellow inside the last
/// tenth of the interval.
pub fn color_for_remaining(remaining: i64, interval: i64) -> &'static str {
    if remaining <= 0 {
        RED
    } else if remaining * 10 <= interval {
        YELLOW
    } else {
        RESET
    }
}

pub fn paint(value: &str, color: &str) -> String {
    if color == RESET {
        value.to_string()
    } else {
        format!("{color}{value}{RESET}")
    }
}

/// Grey out placeholders like "--" or empty cells.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
