use crate::errors::{AppError, AppResult};
use regex::Regex;

/// Inclusive week-id interval selected with `--range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub from: i64,
    pub to: i64,
}

impl WeekRange {
    pub fn contains(&self, week_id: i64) -> bool {
        (self.from..=self.to).contains(&week_id)
    }

    /// `N`, `N:M` or `all` (→ `None`).
    pub fn parse(raw: &str) -> AppResult<Option<Self>> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Ok(None);
        }

        let re = Regex::new(r"^(\d+)(?:\s*:\s*(\d+))?$")
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        let caps = re.captures(raw).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "invalid range '{}': expected N, N:M or all",
                raw
            ))
        })?;

        let from = parse_week(&caps[1])?;
        let to = match caps.get(2) {
            Some(m) => parse_week(m.as_str())?,
            None => from,
        };

        if to < from {
            return Err(AppError::InvalidInput(format!(
                "invalid range '{}': end week {} precedes start week {}",
                raw, to, from
            )));
        }

        Ok(Some(Self { from, to }))
    }
}

fn parse_week(s: &str) -> AppResult<i64> {
    s.parse()
        .map_err(|_| AppError::InvalidInput(format!("invalid week id '{}'", s)))
}
