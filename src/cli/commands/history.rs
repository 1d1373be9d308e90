use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::odometer::OdometerLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::km;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { vehicle } = cmd {
        let ctx = LedgerContext::from_config(cfg)?;
        let entries = OdometerLogic::history(&ctx, *vehicle)?;

        if entries.is_empty() {
            info(format!("No odometer readings for vehicle {}.", vehicle));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::right("WEEK"),
            Column::right("KM"),
            Column::left("RECORDED AT"),
            Column::left("OPERATOR"),
        ]);
        for e in &entries {
            table.add_row(vec![
                e.week_id.to_string(),
                km(e.km),
                e.recorded_at.clone(),
                e.operator.clone(),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
