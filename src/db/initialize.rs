use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Tables every lab database must carry once migrated.
const LAB_TABLES: [&str; 10] = [
    "locations",
    "workstations",
    "mac_addresses",
    "os_types",
    "layout_rows",
    "layout_cells",
    "sessions",
    "applications",
    "reported_applications",
    "application_uses",
];

/// Bring the schema up to date and verify the lab tables are in place.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    for table in LAB_TABLES {
        let n: i64 = stmt.query_row([table], |row| row.get(0))?;
        if n == 0 {
            return Err(AppError::Migration(format!("table '{table}' missing")));
        }
    }

    Ok(())
}
