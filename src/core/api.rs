//! Request handlers for lab clients and dashboards.
//!
//! Each handler resolves the identifiers it is given (MAC address, location
//! slug), delegates to the core, and reports failure as a bad-request
//! status or an absent payload. Storage errors are the only `Err` values.

use crate::core::account::AccountFilter;
use crate::core::filter::SessionFilter;
use crate::core::location::LocationLogic;
use crate::core::session::SessionLogic;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::location::Location;
use crate::utils::date::parse_iso_datetime;
use chrono::SecondsFormat;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Status::BadRequest)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateSessionRequest {
    pub mac: String,
    pub os_type: String,
    pub os_version: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EndSessionRequest {
    pub mac: String,
    /// Comma-separated `name#start#end` tokens; `name#0#0` without timing.
    pub apps: String,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MacInfo {
    #[serde(rename = "type")]
    pub nic_type: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkstationUsage {
    pub name: String,
    pub mac_addresses: Vec<MacInfo>,
    /// RFC 3339 start of the open session, in the location's time zone.
    pub session_start: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentUsage {
    pub workstations: Vec<WorkstationUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationInfo {
    pub name: String,
    pub open_workstations: i64,
    pub total_workstations: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationActivity {
    pub total_users: i64,
}

/// Parse the `apps` field of an end-of-session report into
/// `(reported_name, seconds)` pairs.
///
/// A token whose start and end are both `0` has no timing and counts 0
/// seconds; otherwise both must be ISO 8601 datetimes and the duration is
/// their difference (never negative). Any malformed token rejects the
/// whole field.
pub fn parse_apps(apps: &str) -> Option<Vec<(String, i64)>> {
    let mut out = Vec::new();

    for token in apps.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let parts: Vec<&str> = token.split('#').collect();
        let [name, start, end] = parts.as_slice() else {
            return None;
        };

        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let duration = if start.trim() == "0" && end.trim() == "0" {
            0
        } else {
            let start = parse_iso_datetime(start)?;
            let end = parse_iso_datetime(end)?;
            (end - start).num_seconds().max(0)
        };

        out.push((name.to_string(), duration));
    }

    Some(out)
}

/// Open a session for the workstation owning `req.mac`.
pub fn create_session(
    conn: &mut Connection,
    req: &CreateSessionRequest,
    accounts: &dyn AccountFilter,
) -> AppResult<Status> {
    let Some(workstation) = queries::trackable_by_mac(conn, &req.mac)? else {
        return Ok(Status::BadRequest);
    };

    let os = queries::get_or_create_os_type(
        conn,
        Some(req.os_type.as_str()),
        req.os_version.as_deref(),
    )?;

    if !accounts.is_user_loggable(req.user.as_deref(), &workstation) {
        return Ok(Status::BadRequest);
    }

    let session = SessionLogic::start_session(conn, Some(&workstation), os.as_ref())?;
    Ok(if session.is_some() {
        Status::Created
    } else {
        Status::BadRequest
    })
}

/// Close the open session of the workstation owning `req.mac`.
pub fn end_session(conn: &mut Connection, req: &EndSessionRequest) -> AppResult<Status> {
    let Some(workstation) = queries::trackable_by_mac(conn, &req.mac)? else {
        return Ok(Status::BadRequest);
    };

    let Some(apps) = parse_apps(&req.apps) else {
        return Ok(Status::BadRequest);
    };

    let session = SessionLogic::end_session(conn, &workstation, &apps, req.offset)?;
    Ok(if session.is_some() {
        Status::Ok
    } else {
        Status::BadRequest
    })
}

fn location(conn: &Connection, slug: &str) -> AppResult<Option<Location>> {
    queries::location_by_slug(conn, slug)
}

/// Separator of MAC addresses in payloads, whatever the display setting.
const PAYLOAD_MAC_SEPARATOR: &str = ":";

/// Workstations of a location with their MACs and open-session start.
pub fn current_usage(conn: &Connection, slug: &str) -> AppResult<Option<CurrentUsage>> {
    let Some(location) = location(conn, slug)? else {
        return Ok(None);
    };

    let mut workstations = Vec::new();
    for ws in queries::workstations_for_location(conn, location.id, true)? {
        let mac_addresses = queries::macs_for_workstation(conn, ws.id)?
            .iter()
            .map(|m| MacInfo {
                nic_type: m.nic.to_db_str().to_string(),
                address: m.address_with_separators(PAYLOAD_MAC_SEPARATOR),
            })
            .collect();

        let session_start = SessionLogic::active_session_for_workstation(conn, ws.id)?.map(|s| {
            location
                .localize(&s.start)
                .to_rfc3339_opts(SecondsFormat::Secs, false)
        });

        workstations.push(WorkstationUsage {
            name: ws.name,
            mac_addresses,
            session_start,
        });
    }

    Ok(Some(CurrentUsage { workstations }))
}

/// Name and occupancy of a location.
pub fn location_info(conn: &Connection, slug: &str) -> AppResult<Option<LocationInfo>> {
    let Some(location) = location(conn, slug)? else {
        return Ok(None);
    };

    Ok(Some(LocationInfo {
        open_workstations: LocationLogic::open_workstation_count(conn, &location)?,
        total_workstations: LocationLogic::total_workstation_count(conn, &location)?,
        name: location.name,
    }))
}

/// Number of sessions logged at a location, optionally bounded by
/// ISO 8601 datetimes (compared by date). Unknown slugs and malformed
/// datetimes give `None`.
pub fn location_activity(
    conn: &Connection,
    slug: &str,
    start_dt: Option<&str>,
    end_dt: Option<&str>,
) -> AppResult<Option<LocationActivity>> {
    let Some(location) = location(conn, slug)? else {
        return Ok(None);
    };

    let mut filter = SessionFilter::for_location(location.id);

    if let Some(s) = start_dt.filter(|s| !s.trim().is_empty()) {
        let Some(dt) = parse_iso_datetime(s) else {
            return Ok(None);
        };
        filter.start_date = Some(dt.date());
    }
    if let Some(s) = end_dt.filter(|s| !s.trim().is_empty()) {
        let Some(dt) = parse_iso_datetime(s) else {
            return Ok(None);
        };
        filter.end_date = Some(dt.date());
    }

    Ok(Some(LocationActivity {
        total_users: SessionLogic::count_sessions(conn, &filter)?,
    }))
}
