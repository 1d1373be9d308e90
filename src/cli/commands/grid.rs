use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::query::{GridQuery, GridRow, WeekGrid};
use crate::errors::AppResult;
use crate::models::service_event::ServiceStatus;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RED, YELLOW, color_for_remaining, color_for_state, colorize_optional, paint};
use crate::utils::formatting::{km, opt_id, reading};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Grid { week, json } = cmd {
        let ctx = LedgerContext::from_config(cfg)?;
        let grid = GridQuery::week_grid(&ctx, *week)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&grid)?);
            return Ok(());
        }

        print_grid(*week, &grid);
    }
    Ok(())
}

fn print_grid(week_id: i64, grid: &WeekGrid) {
    match &grid.week {
        Some(w) => header(format!(
            "Week {} ({} → {}) [{}]",
            week_id,
            w.start_date,
            w.end_date,
            grid.status.as_str()
        )),
        None => header(format!("Week {} [{}]", week_id, grid.status.as_str())),
    }

    if grid.rows.is_empty() {
        info(format!("Week {} has not been synced yet.", week_id));
        return;
    }

    let mut table = Table::new(vec![
        Column::right("VEHICLE"),
        Column::left("PLATE"),
        Column::right("CLIENT"),
        Column::right("KM PREV"),
        Column::right("KM NOW"),
        Column::right("WEEK KM"),
        Column::left("STATE"),
        Column::right("OIL LEFT"),
        Column::right("BELT LEFT"),
        Column::left("ALERTS"),
        Column::left("SHOP"),
        Column::right("VER"),
    ]);

    for row in &grid.rows {
        table.add_row(render_row(row));
    }

    print!("{}", table.render());
}

fn render_row(row: &GridRow) -> Vec<String> {
    let rec = &row.record;

    let oil_left = match (row.remaining.oil_km, &row.config) {
        (Some(left), Some(cfg)) => paint(&km(left), color_for_remaining(left, cfg.oil_interval_km)),
        _ => colorize_optional("--"),
    };
    let belt_left = match (row.remaining.belt_km, &row.config) {
        (Some(left), Some(cfg)) => paint(&km(left), color_for_remaining(left, cfg.belt_interval_km)),
        _ => colorize_optional("--"),
    };

    let alerts = if row.alerts.is_empty() {
        colorize_optional("--")
    } else {
        paint(&row.alerts.tags(), RED)
    };

    let shop = match &row.open_service {
        Some(ev) => {
            let label = match ev.status {
                ServiceStatus::Scheduled => format!("{} booked", ev.kind.to_db_str()),
                _ if ev.unplanned => format!("{} unplanned", ev.kind.to_db_str()),
                _ => format!("{} in shop", ev.kind.to_db_str()),
            };
            paint(&label, YELLOW)
        }
        None => colorize_optional("--"),
    };

    let state = if rec.closed {
        format!("{} 🔒", paint(rec.state.label(), color_for_state(rec.state)))
    } else {
        paint(rec.state.label(), color_for_state(rec.state))
    };

    vec![
        rec.vehicle_id.to_string(),
        row.plate.clone().unwrap_or_else(|| "?".into()),
        colorize_optional(&opt_id(rec.assigned_client)),
        reading(rec.km_previous),
        colorize_optional(&reading(rec.km_current)),
        if rec.is_read() { km(rec.weekly_km()) } else { colorize_optional("--") },
        state,
        oil_left,
        belt_left,
        alerts,
        shop,
        rec.version.to_string(),
    ]
}
