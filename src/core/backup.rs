use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the tenant database to `dest_file`, optionally zipped.
    ///
    /// Uses SQLite's `VACUUM INTO` so the copy is consistent even while
    /// another process holds the database open.
    pub fn backup(
        conn: &Connection,
        db_path: &str,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("database {}", src.display())));
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if dest.exists() {
            if !force {
                return Err(AppError::InvalidInput(format!(
                    "'{}' already exists (use --force to overwrite)",
                    dest.display()
                )));
            }
            fs::remove_file(dest)?;
        }

        conn.execute("VACUUM INTO ?1", [dest.to_string_lossy().as_ref()])?;

        let final_path = if compress {
            let zipped = compress_backup(dest, force)?;
            fs::remove_file(dest)?;
            zipped
        } else {
            dest.to_path_buf()
        };

        ttlog(
            conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(final_path)
    }
}

fn compress_backup(path: &Path, force: bool) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    if zip_path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "'{}' already exists (use --force to overwrite)",
            zip_path.display()
        )));
    }

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fleetledger.sqlite".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(zip_path)
}
