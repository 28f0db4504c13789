//! Applications, reported names and per-session application uses.

use crate::errors::AppResult;
use crate::models::application::{Application, ApplicationUse};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_application(row: &Row) -> Result<Application> {
    Ok(Application {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub fn map_usage(row: &Row) -> Result<ApplicationUse> {
    Ok(ApplicationUse {
        id: row.get("id")?,
        application_id: row.get("application_id")?,
        session_id: row.get("session_id")?,
        duration: row.get("duration")?,
    })
}

pub fn get_or_create_application(conn: &Connection, name: &str) -> AppResult<Application> {
    conn.execute(
        "INSERT OR IGNORE INTO applications (name) VALUES (?1)",
        [name],
    )?;

    let app = conn.query_row(
        "SELECT * FROM applications WHERE name = ?1",
        [name],
        map_application,
    )?;
    Ok(app)
}

pub fn load_applications(conn: &Connection) -> AppResult<Vec<Application>> {
    let mut stmt = conn.prepare("SELECT * FROM applications ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_application)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Map `reported_name` at a location onto an application.
/// An existing mapping for the same name is repointed.
pub fn map_reported_name(
    conn: &Connection,
    reported_name: &str,
    application_id: i64,
    location_id: i64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO reported_applications (name, application_id, location_id)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(name, location_id) DO UPDATE SET application_id = excluded.application_id",
        params![reported_name, application_id, location_id],
    )?;
    Ok(())
}

/// Reported names of an application at a location.
pub fn reported_names(
    conn: &Connection,
    application_id: i64,
    location_id: i64,
) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT name FROM reported_applications
         WHERE application_id = ?1 AND location_id = ?2
         ORDER BY name ASC",
    )?;
    let rows = stmt.query_map(params![application_id, location_id], |row| row.get(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Canonical application for a name reported at a location.
pub fn resolve_reported(
    conn: &Connection,
    reported_name: &str,
    location_id: i64,
) -> AppResult<Option<Application>> {
    let app = conn
        .query_row(
            "SELECT a.* FROM reported_applications r
             JOIN applications a ON a.id = r.application_id
             WHERE r.name = ?1 AND r.location_id = ?2",
            params![reported_name, location_id],
            map_application,
        )
        .optional()?;
    Ok(app)
}

/// Add `duration` seconds to the (session, application) row, creating it on
/// first use. Returns the accumulated total.
pub fn add_usage(
    conn: &Connection,
    session_id: i64,
    application_id: i64,
    duration: i64,
) -> AppResult<i64> {
    let total = conn.query_row(
        "INSERT INTO application_uses (application_id, session_id, duration)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(session_id, application_id)
         DO UPDATE SET duration = duration + excluded.duration
         RETURNING duration",
        params![application_id, session_id, duration],
        |row| row.get(0),
    )?;
    Ok(total)
}

pub fn usage_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<ApplicationUse>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM application_uses WHERE session_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([session_id], map_usage)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
