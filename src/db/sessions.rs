//! Session rows.

use crate::db::queries::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::utils::date::{DATE_FORMAT, format_timestamp, parse_timestamp};
use crate::utils::time::TIME_FORMAT;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn parse_ts(idx: usize, s: String) -> Result<NaiveDateTime> {
    parse_timestamp(&s).ok_or_else(|| conversion_error(idx, AppError::InvalidDate(s)))
}

fn parse_day(idx: usize, s: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(s)))
}

fn parse_clock(idx: usize, s: String) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(&s, TIME_FORMAT)
        .map_err(|_| conversion_error(idx, AppError::InvalidTime(s)))
}

pub fn map_session(row: &Row) -> Result<Session> {
    let end: Option<String> = row.get("end_ts")?;
    let end_date: Option<String> = row.get("end_date")?;
    let end_time: Option<String> = row.get("end_time")?;

    Ok(Session {
        id: row.get("id")?,
        workstation_id: row.get("workstation_id")?,
        os_type_id: row.get("os_type_id")?,
        start: parse_ts(3, row.get("start_ts")?)?,
        start_date: parse_day(4, row.get("start_date")?)?,
        start_time: parse_clock(5, row.get("start_time")?)?,
        end: end.map(|s| parse_ts(6, s)).transpose()?,
        end_date: end_date.map(|s| parse_day(7, s)).transpose()?,
        end_time: end_time.map(|s| parse_clock(8, s)).transpose()?,
    })
}

/// Insert an open session starting at `start` (microsecond precision).
pub fn insert_session(
    conn: &Connection,
    workstation_id: i64,
    os_type_id: i64,
    start: &NaiveDateTime,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sessions (workstation_id, os_type_id, start_ts, start_date, start_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            workstation_id,
            os_type_id,
            format_timestamp(start),
            start.format(DATE_FORMAT).to_string(),
            start.format(TIME_FORMAT).to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn session_by_id(conn: &Connection, id: i64) -> AppResult<Option<Session>> {
    let s = conn
        .query_row("SELECT * FROM sessions WHERE id = ?1", [id], map_session)
        .optional()?;
    Ok(s)
}

/// Remove every open session of a workstation. Returns how many were dropped.
pub fn delete_open_sessions(conn: &Connection, workstation_id: i64) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM sessions WHERE workstation_id = ?1 AND end_ts IS NULL",
        [workstation_id],
    )?;
    Ok(n)
}

pub fn delete_session(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
    Ok(())
}

/// Most recently started open session of a workstation.
/// Ties on `start_ts` go to the newest row.
pub fn latest_open_session(conn: &Connection, workstation_id: i64) -> AppResult<Option<Session>> {
    let s = conn
        .query_row(
            "SELECT * FROM sessions
             WHERE workstation_id = ?1 AND end_ts IS NULL
             ORDER BY start_ts DESC, id DESC
             LIMIT 1",
            [workstation_id],
            map_session,
        )
        .optional()?;
    Ok(s)
}

pub fn close_session(conn: &Connection, id: i64, end: &NaiveDateTime) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET end_ts = ?1, end_date = ?2, end_time = ?3 WHERE id = ?4",
        params![
            format_timestamp(end),
            end.format(DATE_FORMAT).to_string(),
            end.format(TIME_FORMAT).to_string(),
            id,
        ],
    )?;
    Ok(())
}
