use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::maintenance::MaintenanceLogic;
use crate::errors::AppResult;
use crate::models::maintenance_config::{ConfigPatch, VehicleMaintenanceConfig};
use crate::ui::messages::{header, info, success};
use crate::utils::formatting::{km, yes_no};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Maint {
        vehicle,
        oil_interval,
        last_oil,
        has_belt,
        belt_interval,
        last_belt,
        allowance,
    } = cmd
    {
        let mut ctx = LedgerContext::from_config(cfg)?;

        let patch = ConfigPatch {
            oil_interval_km: *oil_interval,
            last_oil_change_km: *last_oil,
            has_belt: *has_belt,
            belt_interval_km: *belt_interval,
            last_belt_change_km: *last_belt,
            weekly_km_allowance: *allowance,
        };

        if patch.is_empty() {
            match MaintenanceLogic::get(&ctx, *vehicle)? {
                Some(c) => print_config(&c),
                None => info(format!(
                    "Vehicle {} has no maintenance config: no alerts are raised for it.",
                    vehicle
                )),
            }
            return Ok(());
        }

        let stored = MaintenanceLogic::update(&mut ctx, *vehicle, &patch)?;
        success(format!("Maintenance config saved for vehicle {}.", vehicle));
        print_config(&stored);
    }
    Ok(())
}

fn print_config(c: &VehicleMaintenanceConfig) {
    header(format!("Vehicle {} maintenance", c.vehicle_id));
    println!("  oil:       every {} km, last at {} km", km(c.oil_interval_km), km(c.last_oil_change_km));
    println!("  belt:      {}", yes_no(c.has_belt));
    if c.has_belt {
        println!(
            "             every {} km, last at {} km",
            km(c.belt_interval_km),
            km(c.last_belt_change_km)
        );
    }
    println!("  allowance: {} km / week", km(c.weekly_km_allowance));
}
