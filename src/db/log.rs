use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, Row, params};

/// One row of the operations log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

fn map_entry(row: &Row) -> rusqlite::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get("id")?,
        date: row.get("date")?,
        operation: row.get("operation")?,
        target: row.get::<_, Option<String>>("target")?.unwrap_or_default(),
        message: row.get("message")?,
    })
}

/// Log rows in insertion order, optionally restricted to one operation
/// and to the most recent `limit` rows.
pub fn load_entries(
    conn: &Connection,
    operation: Option<&str>,
    limit: Option<usize>,
) -> AppResult<Vec<LogEntry>> {
    let limit = limit.map(|n| n as i64).unwrap_or(-1);

    let mut stmt = conn.prepare_cached(
        "SELECT * FROM (
             SELECT id, date, operation, target, message FROM log
             WHERE ?1 IS NULL OR operation = ?1
             ORDER BY id DESC
             LIMIT ?2
         ) ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![operation, limit], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
