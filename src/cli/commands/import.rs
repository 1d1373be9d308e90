use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::LedgerContext;
use crate::core::import::ImportLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let mut ctx = LedgerContext::from_config(cfg)?;
        let report = ImportLogic::import_file(&mut ctx, Path::new(file))?;
        success(format!(
            "Imported {} vehicle(s), {} week(s), {} assignment line(s) from {}",
            report.vehicles, report.weeks, report.lines, file
        ));
    }
    Ok(())
}
