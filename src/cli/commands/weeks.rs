use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::query::WeekQuery;
use crate::errors::AppResult;
use crate::models::week::{WeekStatus, WeekSummary};
use crate::ui::messages::info;
use crate::utils::colors::{GREEN, GREY, YELLOW, paint};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Weeks { next, json } = cmd {
        let ctx = LedgerContext::from_config(cfg)?;

        let weeks = if *next {
            WeekQuery::next_to_sync(&ctx)?.into_iter().collect()
        } else {
            WeekQuery::list_weeks(&ctx)?
        };

        if *json {
            println!("{}", serde_json::to_string_pretty(&weeks)?);
            return Ok(());
        }

        if weeks.is_empty() {
            if *next {
                info("Every grid week is already synced.");
            } else {
                info("No weeks in the scheduling grid. Import a snapshot first.");
            }
            return Ok(());
        }

        print_weeks(&weeks);
    }
    Ok(())
}

fn print_weeks(weeks: &[WeekSummary]) {
    let mut table = Table::new(vec![
        Column::right("WEEK"),
        Column::left("FROM"),
        Column::left("TO"),
        Column::right("RECORDS"),
        Column::left("STATUS"),
    ]);

    for w in weeks {
        let color = match w.status {
            WeekStatus::Pending => GREY,
            WeekStatus::Open => YELLOW,
            WeekStatus::Closed => GREEN,
        };
        table.add_row(vec![
            w.id.to_string(),
            w.start_date.to_string(),
            w.end_date.to_string(),
            w.records.to_string(),
            paint(w.status.as_str(), color),
        ]);
    }

    print!("{}", table.render());
}
