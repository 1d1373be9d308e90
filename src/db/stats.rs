use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

const COUNTED_TABLES: &[(&str, &str)] = &[
    ("vehicles", "Vehicles"),
    ("weeks", "Grid weeks"),
    ("maintenance_configs", "Maintenance configs"),
    ("control_records", "Control records"),
    ("service_events", "Service events"),
    ("km_history", "Odometer readings"),
];

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    for (table, label) in COUNTED_TABLES {
        let count: i64 =
            pool.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, count, RESET);
    }

    // Ledger span: first and last week that own control records.
    let span: Option<(Option<i64>, Option<i64>)> = pool
        .conn
        .query_row(
            "SELECT MIN(week_id), MAX(week_id) FROM control_records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let fmt = |w: Option<i64>| {
        w.map(|v| v.to_string())
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };
    let (first, last) = span.unwrap_or((None, None));

    println!("{}• Ledger weeks:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    println!();
    Ok(())
}
