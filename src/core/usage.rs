//! Application usage: normalization of reported names and duration totals.

use crate::core::filter::{SessionFilter, workstation_alias};
use crate::db::{applications, queries};
use crate::errors::AppResult;
use crate::models::application::{ApplicationTotal, ApplicationUse};
use crate::models::session::Session;
use rusqlite::{Connection, params_from_iter};

const PREFIX: &str = "session";

/// Application uses joined to their session and the session's workstation,
/// as expected by `SessionFilter::build(Some("session"))`.
fn usage_source() -> String {
    let ws = workstation_alias(Some(PREFIX));
    format!(
        "application_uses
         JOIN sessions AS {PREFIX} ON {PREFIX}.id = application_uses.session_id
         JOIN workstations AS {ws} ON {ws}.id = {PREFIX}.workstation_id"
    )
}

pub struct UsageLogic;

impl UsageLogic {
    /// Record `duration` seconds of use of a reported application.
    ///
    /// The name is resolved among the reported names of the session's
    /// location. Unknown names are dropped without a trace: only mapped
    /// applications are tracked. Repeated reports of the same application in
    /// one session add up. Returns whether anything was recorded.
    pub fn log_usage(
        conn: &Connection,
        session: &Session,
        reported_name: &str,
        duration: i64,
    ) -> AppResult<bool> {
        let Some(workstation) = queries::workstation_by_id(conn, session.workstation_id)? else {
            return Ok(false);
        };

        let Some(application) =
            applications::resolve_reported(conn, reported_name, workstation.location_id)?
        else {
            return Ok(false);
        };

        applications::add_usage(conn, session.id, application.id, duration.max(0))?;

        Ok(true)
    }

    /// All application uses belonging to sessions that match the filter.
    pub fn all_for_filters(
        conn: &Connection,
        filter: &SessionFilter,
    ) -> AppResult<Vec<ApplicationUse>> {
        let f = filter.build(Some(PREFIX));
        let sql = format!(
            "SELECT application_uses.* FROM {} WHERE {}
             ORDER BY {PREFIX}.start_ts ASC, application_uses.id ASC",
            usage_source(),
            f.where_clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(f.params()), applications::map_usage)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Usage per canonical application over the filtered sessions,
    /// longest total first.
    pub fn usage_totals(
        conn: &Connection,
        filter: &SessionFilter,
    ) -> AppResult<Vec<ApplicationTotal>> {
        let f = filter.build(Some(PREFIX));
        let sql = format!(
            "SELECT app.name, COUNT(DISTINCT application_uses.session_id), SUM(application_uses.duration)
             FROM {} JOIN applications AS app ON app.id = application_uses.application_id
             WHERE {}
             GROUP BY app.id
             ORDER BY 3 DESC, app.name ASC",
            usage_source(),
            f.where_clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(f.params()), |row| {
            Ok(ApplicationTotal {
                application: row.get(0)?,
                sessions: row.get(1)?,
                duration: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}
