use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::odometer::OdometerLogic;
use crate::errors::AppResult;
use crate::models::control_record::RecordKey;
use crate::ui::messages::success;
use crate::utils::colors::{color_for_state, paint};
use crate::utils::formatting::km as fmt_km;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Km {
        week,
        vehicle,
        km,
        expect_version,
    } = cmd
    {
        let mut ctx = LedgerContext::from_config(cfg)?;
        let key = RecordKey::new(*week, *vehicle);
        let rec = OdometerLogic::register(&mut ctx, key, *km, *expect_version)?;

        success(format!(
            "{}: {} km ({} this week) → {} (version {})",
            key,
            fmt_km(rec.km_current),
            fmt_km(rec.weekly_km()),
            paint(rec.state.label(), color_for_state(rec.state)),
            rec.version
        ));
    }
    Ok(())
}
