use crate::cli::parser::{Commands, ServiceAction};
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::service::{ServiceLifecycle, ServiceOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::control_record::RecordKey;
use crate::models::service_event::{ServiceEvent, ServiceKind};
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::yes_no;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Service {
        action,
        vehicle,
        week,
        kind,
        serviced,
        expect_version,
    } = cmd
    {
        let mut ctx = LedgerContext::from_config(cfg)?;

        let outcome = match action {
            ServiceAction::List => {
                let events = ServiceLifecycle::list(&ctx, *vehicle)?;
                if events.is_empty() {
                    info(format!("No service events for vehicle {}.", vehicle));
                } else {
                    print_events(&events);
                }
                return Ok(());
            }
            ServiceAction::Schedule => ServiceLifecycle::schedule(
                &mut ctx,
                record_key(*week, *vehicle)?,
                require_kind(*kind)?,
                *expect_version,
            )?,
            ServiceAction::Enter => {
                ServiceLifecycle::enter_shop(&mut ctx, record_key(*week, *vehicle)?, *expect_version)?
            }
            ServiceAction::Unplanned => ServiceLifecycle::request_unplanned(
                &mut ctx,
                record_key(*week, *vehicle)?,
                require_kind(*kind)?,
                *expect_version,
            )?,
            ServiceAction::Exit => ServiceLifecycle::exit_shop(
                &mut ctx,
                record_key(*week, *vehicle)?,
                serviced,
                *expect_version,
            )?,
        };

        report(*action, &outcome);
    }
    Ok(())
}

fn record_key(week: Option<i64>, vehicle: i64) -> AppResult<RecordKey> {
    let week = week.ok_or_else(|| AppError::InvalidInput("--week is required".into()))?;
    Ok(RecordKey::new(week, vehicle))
}

fn require_kind(kind: Option<ServiceKind>) -> AppResult<ServiceKind> {
    kind.ok_or_else(|| AppError::InvalidInput("--kind is required".into()))
}

fn report(action: ServiceAction, out: &ServiceOutcome) {
    let verb = match action {
        ServiceAction::Schedule => "scheduled",
        ServiceAction::Enter => "entered the shop",
        ServiceAction::Unplanned => "entered the shop (unplanned)",
        ServiceAction::Exit => "left the shop",
        ServiceAction::List => "listed",
    };
    success(format!(
        "{}: {} service {} (event {}) → {} (version {})",
        out.record.key(),
        out.event.kind.to_db_str(),
        verb,
        out.event.id,
        out.record.state.label(),
        out.record.version
    ));
}

fn print_events(events: &[ServiceEvent]) {
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::right("WEEK"),
        Column::left("KIND"),
        Column::left("STATUS"),
        Column::left("UNPLANNED"),
        Column::left("SCHEDULED"),
        Column::left("ENTERED"),
        Column::left("EXITED"),
        Column::left("SERVICED"),
    ]);

    let opt = |v: &Option<String>| colorize_optional(v.as_deref().unwrap_or("--"));

    for ev in events {
        table.add_row(vec![
            ev.id.to_string(),
            ev.week_id.to_string(),
            ev.kind.to_db_str().to_string(),
            ev.status.to_db_str().to_string(),
            yes_no(ev.unplanned).to_string(),
            opt(&ev.scheduled_at),
            opt(&ev.entered_at),
            opt(&ev.exited_at),
            colorize_optional(&ServiceKind::list_to_db_str(&ev.serviced)),
        ]);
    }

    print!("{}", table.render());
}
