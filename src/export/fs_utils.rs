use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Export targets must be absolute. An existing file is only replaced with
/// `force`; missing parent directories are created.
pub(crate) fn prepare_output(path: &Path, force: bool) -> AppResult<()> {
    if !path.is_absolute() {
        return Err(AppError::Export(format!(
            "output file path must be absolute: {}",
            path.display()
        )));
    }

    if path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    Ok(())
}
