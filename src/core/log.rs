use crate::db::log::{LogRow, load_log};
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use unicode_width::UnicodeWidthStr;

const OP_TARGET_MAX: usize = 48;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "sync" | "import" => Colour::Green,
        "odometer" => Colour::Cyan,
        "maintenance" => Colour::Yellow,
        "close" => Colour::Blue,
        "delete" => Colour::Red,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        other if other.starts_with("service_") => Colour::RGB(0, 175, 175),
        _ => Colour::White,
    }
}

fn op_target(row: &LogRow) -> String {
    let joined = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    if joined.width() > OP_TARGET_MAX {
        let mut cut: String = joined.chars().take(OP_TARGET_MAX - 3).collect();
        cut.push_str("...");
        cut
    } else {
        joined
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Audit rows, optionally only those whose operation, target or message
    /// match `filter` (a regular expression).
    pub fn entries(conn: &Connection, filter: Option<&str>) -> AppResult<Vec<LogRow>> {
        let rows = load_log(conn)?;

        let Some(pattern) = filter else {
            return Ok(rows);
        };
        let re = Regex::new(pattern)
            .map_err(|e| AppError::InvalidInput(format!("invalid log filter '{}': {}", pattern, e)))?;

        Ok(rows
            .into_iter()
            .filter(|r| re.is_match(&r.operation) || re.is_match(&r.target) || re.is_match(&r.message))
            .collect())
    }

    pub fn print_log(conn: &Connection, filter: Option<&str>) -> AppResult<()> {
        let entries = Self::entries(conn, filter)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let labels: Vec<String> = entries.iter().map(op_target).collect();
        let op_w = labels.iter().map(|l| l.width()).max().unwrap_or(10);
        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);

        println!("📜 Internal log:\n");

        for (row, label) in entries.iter().zip(labels) {
            let date = chrono::DateTime::parse_from_rfc3339(&row.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| row.date.clone());

            // only the operation word is colored; pad on the visible width
            let painted = match label.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color_for_operation(&row.operation).paint(op), rest),
                None => color_for_operation(&row.operation).paint(label.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(label.width()));

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                row.id,
                date,
                painted,
                padding,
                row.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}
