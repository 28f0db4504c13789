//! Session lifecycle: closed → open → closed, one open session per workstation.

use crate::core::filter::{SessionFilter, workstation_alias};
use crate::core::usage::UsageLogic;
use crate::db::log::ttlog;
use crate::db::sessions;
use crate::errors::AppResult;
use crate::models::os_type::OsType;
use crate::models::session::Session;
use crate::models::workstation::Workstation;
use crate::utils::date::{self, format_datetime};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params_from_iter};

/// Sessions joined to their workstation, as expected by `SessionFilter::build(None)`.
fn session_source() -> String {
    let ws = workstation_alias(None);
    format!("sessions JOIN workstations AS {ws} ON {ws}.id = sessions.workstation_id")
}

/// Timestamps are stored with microsecond precision.
fn to_micros(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(ts.nanosecond() / 1_000 * 1_000).unwrap_or(ts)
}

pub struct SessionLogic;

impl SessionLogic {
    /// Open a new session for the workstation, starting now.
    pub fn start_session(
        conn: &mut Connection,
        workstation: Option<&Workstation>,
        os: Option<&OsType>,
    ) -> AppResult<Option<Session>> {
        Self::start_session_at(conn, workstation, os, date::now())
    }

    /// Open a new session starting at `now`.
    ///
    /// Both the workstation and the OS are required; without either nothing
    /// is written and `None` comes back. Any session still open on the
    /// workstation is deleted first: a machine that reports a new start has
    /// lost the end of its previous one.
    pub fn start_session_at(
        conn: &mut Connection,
        workstation: Option<&Workstation>,
        os: Option<&OsType>,
        now: NaiveDateTime,
    ) -> AppResult<Option<Session>> {
        let (Some(workstation), Some(os)) = (workstation, os) else {
            return Ok(None);
        };

        let start = to_micros(now);
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let dropped = sessions::delete_open_sessions(&tx, workstation.id)?;
        if dropped > 0 {
            ttlog(
                &tx,
                "discard",
                &workstation.name,
                &format!("Deleted {dropped} unclosed session(s) before opening a new one"),
            )?;
        }

        let id = sessions::insert_session(&tx, workstation.id, os.id, &start)?;
        ttlog(
            &tx,
            "start",
            &workstation.name,
            &format!("Session {id} opened at {} ({os})", format_datetime(&start)),
        )?;

        let session = sessions::session_by_id(&tx, id)?;
        tx.commit()?;

        Ok(session)
    }

    /// Close the workstation's open session now, see `end_session_at`.
    pub fn end_session(
        conn: &mut Connection,
        workstation: &Workstation,
        apps_used: &[(String, i64)],
        time_offset: i64,
    ) -> AppResult<Option<Session>> {
        Self::end_session_at(conn, workstation, apps_used, time_offset, date::now())
    }

    /// Close the most recently started open session of the workstation.
    ///
    /// The end is `now + time_offset` seconds; a negative offset trims an
    /// idle tail (e.g. automatic logout). An end that is not after the start
    /// marks the session as corrupt: it is deleted and `None` is returned.
    /// Every `(reported_name, seconds)` pair in `apps_used` is then logged
    /// against the closed session.
    pub fn end_session_at(
        conn: &mut Connection,
        workstation: &Workstation,
        apps_used: &[(String, i64)],
        time_offset: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<Session>> {
        let Some(end) = TimeDelta::try_seconds(time_offset)
            .and_then(|offset| now.checked_add_signed(offset))
            .map(to_micros)
        else {
            return Ok(None);
        };

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(session) = sessions::latest_open_session(&tx, workstation.id)? else {
            return Ok(None);
        };

        if end <= session.start {
            sessions::delete_session(&tx, session.id)?;
            ttlog(
                &tx,
                "discard",
                &workstation.name,
                &format!(
                    "Session {} deleted: end {} is not after start {}",
                    session.id,
                    format_datetime(&end),
                    format_datetime(&session.start)
                ),
            )?;
            tx.commit()?;
            return Ok(None);
        }

        sessions::close_session(&tx, session.id, &end)?;

        let Some(closed) = sessions::session_by_id(&tx, session.id)? else {
            return Ok(None);
        };

        let mut logged = 0;
        for (reported_name, duration) in apps_used {
            if UsageLogic::log_usage(&tx, &closed, reported_name, *duration)? {
                logged += 1;
            }
        }

        ttlog(
            &tx,
            "end",
            &workstation.name,
            &format!(
                "Session {} closed at {} ({} of {} app reports recorded)",
                closed.id,
                format_datetime(&end),
                logged,
                apps_used.len()
            ),
        )?;
        tx.commit()?;

        Ok(Some(closed))
    }

    /// Sessions matching the filter, ordered by start.
    pub fn filter_sessions(conn: &Connection, filter: &SessionFilter) -> AppResult<Vec<Session>> {
        let f = filter.build(None);
        let sql = format!(
            "SELECT sessions.* FROM {} WHERE {} ORDER BY sessions.start_ts ASC, sessions.id ASC",
            session_source(),
            f.where_clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(f.params()), sessions::map_session)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Number of sessions matching the filter.
    pub fn count_sessions(conn: &Connection, filter: &SessionFilter) -> AppResult<i64> {
        let f = filter.build(None);
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            session_source(),
            f.where_clause()
        );

        let n = conn.query_row(&sql, params_from_iter(f.params()), |row| row.get(0))?;
        Ok(n)
    }

    /// Open sessions on tracked workstations of a location.
    pub fn open_for_location(conn: &Connection, location_id: i64) -> AppResult<Vec<Session>> {
        let mut stmt = conn.prepare(
            "SELECT s.* FROM sessions s
             JOIN workstations w ON w.id = s.workstation_id
             WHERE w.track = 1 AND w.location_id = ?1 AND s.end_ts IS NULL
             ORDER BY s.start_ts ASC, s.id ASC",
        )?;
        let rows = stmt.query_map([location_id], sessions::map_session)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// The session currently open on a workstation, if any.
    pub fn active_session_for_workstation(
        conn: &Connection,
        workstation_id: i64,
    ) -> AppResult<Option<Session>> {
        sessions::latest_open_session(conn, workstation_id)
    }

    /// Date of the earliest recorded session at a location.
    pub fn first_session_date_for_location(
        conn: &Connection,
        location_id: i64,
    ) -> AppResult<Option<NaiveDate>> {
        let first: Option<String> = conn
            .query_row(
                "SELECT s.start_date FROM sessions s
                 JOIN workstations w ON w.id = s.workstation_id
                 WHERE w.location_id = ?1
                 ORDER BY s.start_date ASC
                 LIMIT 1",
                [location_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(first.as_deref().and_then(date::parse_date))
    }
}
