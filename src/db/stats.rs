use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::parse_date;
use rusqlite::Connection;
use std::fs;

fn count(conn: &Connection, sql: &str) -> rusqlite::Result<i64> {
    conn.query_row(sql, [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    let conn = &pool.conn;
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) REGISTRY
    //
    let locations = count(conn, "SELECT COUNT(*) FROM locations")?;
    let workstations = count(conn, "SELECT COUNT(*) FROM workstations")?;
    let tracked = count(conn, "SELECT COUNT(*) FROM workstations WHERE track = 1")?;
    let applications = count(conn, "SELECT COUNT(*) FROM applications")?;

    println!("{}• Locations:{} {}", CYAN, RESET, locations);
    println!(
        "{}• Workstations:{} {} ({} tracked)",
        CYAN, RESET, workstations, tracked
    );
    println!("{}• Applications:{} {}", CYAN, RESET, applications);

    //
    // 3) SESSIONS
    //
    let sessions = count(conn, "SELECT COUNT(*) FROM sessions")?;
    let open = count(conn, "SELECT COUNT(*) FROM sessions WHERE end_ts IS NULL")?;
    println!(
        "{}• Total sessions:{} {}{}{} ({} open)",
        CYAN, RESET, GREEN, sessions, RESET, open
    );

    //
    // 4) DATE RANGE
    //
    let (first, last): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(start_date), MAX(start_date) FROM sessions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", first.as_deref().unwrap_or(&dash));
    println!("    to:   {}", last.as_deref().unwrap_or(&dash));

    //
    // 5) AVERAGE SESSIONS/DAY
    //
    if let (Some(d1), Some(d2)) = (
        first.as_deref().and_then(parse_date),
        last.as_deref().and_then(parse_date),
    ) {
        let days = (d2 - d1).num_days().max(1);
        let avg = sessions as f64 / days as f64;
        println!("{}• Average sessions/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
