//! Identity registry: locations, workstations, MAC addresses, OS types.

use crate::errors::{AppError, AppResult};
use crate::models::location::Location;
use crate::models::mac_address::{MacAddress, NicType};
use crate::models::os_type::{OsName, OsType};
use crate::models::workstation::Workstation;
use crate::utils::time::{format_time, parse_time};
use chrono::NaiveTime;
use chrono_tz::Tz;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Wrap a parse failure on a TEXT column into a rusqlite conversion error.
pub(crate) fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

// ---------------------------
// Locations
// ---------------------------

pub fn map_location(row: &Row) -> Result<Location> {
    let opens: String = row.get("earliest_opening")?;
    let closes: String = row.get("latest_closing")?;
    let tz_str: String = row.get("timezone")?;

    let earliest_opening =
        parse_time(&opens).ok_or_else(|| conversion_error(3, AppError::InvalidTime(opens)))?;
    let latest_closing =
        parse_time(&closes).ok_or_else(|| conversion_error(4, AppError::InvalidTime(closes)))?;
    let timezone = tz_str
        .parse::<Tz>()
        .map_err(|_| conversion_error(5, AppError::InvalidTimezone(tz_str.clone())))?;

    Ok(Location {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        earliest_opening,
        latest_closing,
        timezone,
        is_default: row.get::<_, i32>("is_default")? == 1,
    })
}

pub fn insert_location(
    conn: &Connection,
    name: &str,
    slug: &str,
    opens: NaiveTime,
    closes: NaiveTime,
    timezone: Tz,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO locations (name, slug, earliest_opening, latest_closing, timezone, is_default)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        params![
            name,
            slug,
            format_time(&opens),
            format_time(&closes),
            timezone.name(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn location_by_slug(conn: &Connection, slug: &str) -> AppResult<Option<Location>> {
    let loc = conn
        .query_row(
            "SELECT * FROM locations WHERE slug = ?1",
            [slug],
            map_location,
        )
        .optional()?;
    Ok(loc)
}

pub fn location_by_id(conn: &Connection, id: i64) -> AppResult<Option<Location>> {
    let loc = conn
        .query_row("SELECT * FROM locations WHERE id = ?1", [id], map_location)
        .optional()?;
    Ok(loc)
}

/// All locations, alphabetically by name.
pub fn load_locations(conn: &Connection) -> AppResult<Vec<Location>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM locations ORDER BY name COLLATE NOCASE ASC, name ASC, id ASC",
    )?;
    let rows = stmt.query_map([], map_location)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Workstations
// ---------------------------

pub fn map_workstation(row: &Row) -> Result<Workstation> {
    Ok(Workstation {
        id: row.get("id")?,
        name: row.get("name")?,
        location_id: row.get("location_id")?,
        track: row.get::<_, i32>("track")? == 1,
    })
}

pub fn insert_workstation(
    conn: &Connection,
    location_id: i64,
    name: &str,
    track: bool,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO workstations (name, location_id, track) VALUES (?1, ?2, ?3)",
        params![name, location_id, if track { 1 } else { 0 }],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn workstation_by_id(conn: &Connection, id: i64) -> AppResult<Option<Workstation>> {
    let ws = conn
        .query_row(
            "SELECT * FROM workstations WHERE id = ?1",
            [id],
            map_workstation,
        )
        .optional()?;
    Ok(ws)
}

pub fn workstation_by_name(
    conn: &Connection,
    location_id: i64,
    name: &str,
) -> AppResult<Option<Workstation>> {
    let ws = conn
        .query_row(
            "SELECT * FROM workstations WHERE location_id = ?1 AND name = ?2
             ORDER BY id ASC LIMIT 1",
            params![location_id, name],
            map_workstation,
        )
        .optional()?;
    Ok(ws)
}

/// Workstations of a location ordered by name. With `tracked_only`,
/// untracked machines are left out (the set every statistic works on).
pub fn workstations_for_location(
    conn: &Connection,
    location_id: i64,
    tracked_only: bool,
) -> AppResult<Vec<Workstation>> {
    let sql = if tracked_only {
        "SELECT * FROM workstations WHERE location_id = ?1 AND track = 1 ORDER BY name ASC, id ASC"
    } else {
        "SELECT * FROM workstations WHERE location_id = ?1 ORDER BY name ASC, id ASC"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([location_id], map_workstation)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The trackable workstation owning the given MAC address.
///
/// Any notation accepted by `MacAddress::normalize` works; an unparsable
/// address resolves to nothing.
pub fn trackable_by_mac(conn: &Connection, mac: &str) -> AppResult<Option<Workstation>> {
    let Some(address) = MacAddress::normalize(mac) else {
        return Ok(None);
    };

    let ws = conn
        .query_row(
            "SELECT w.* FROM mac_addresses m
             JOIN workstations w ON w.id = m.workstation_id
             WHERE m.address = ?1 AND w.track = 1",
            [address],
            map_workstation,
        )
        .optional()?;
    Ok(ws)
}

/// Number of tracked workstations at the location.
pub fn total_workstation_count(conn: &Connection, location_id: i64) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM workstations WHERE location_id = ?1 AND track = 1",
        [location_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

// ---------------------------
// MAC addresses
// ---------------------------

pub fn map_mac(row: &Row) -> Result<MacAddress> {
    let nic_str: String = row.get("nic")?;
    let nic = NicType::from_db_str(&nic_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidNic(nic_str.clone())))?;

    Ok(MacAddress {
        id: row.get("id")?,
        workstation_id: row.get("workstation_id")?,
        address: row.get("address")?,
        nic,
    })
}

/// Register a MAC address for a workstation. `raw` may use any notation.
pub fn insert_mac(
    conn: &Connection,
    workstation_id: i64,
    raw: &str,
    nic: NicType,
) -> AppResult<i64> {
    let address = MacAddress::normalize(raw).ok_or_else(|| AppError::InvalidMac(raw.into()))?;

    conn.execute(
        "INSERT INTO mac_addresses (workstation_id, address, nic) VALUES (?1, ?2, ?3)",
        params![workstation_id, address, nic.to_db_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn macs_for_workstation(conn: &Connection, workstation_id: i64) -> AppResult<Vec<MacAddress>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM mac_addresses WHERE workstation_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([workstation_id], map_mac)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// OS types
// ---------------------------

pub fn map_os_type(row: &Row) -> Result<OsType> {
    let name_str: String = row.get("name")?;
    let name = OsName::from_db_str(&name_str)
        .ok_or_else(|| conversion_error(1, AppError::InvalidOsType(name_str.clone())))?;

    Ok(OsType {
        id: row.get("id")?,
        name,
        version: row.get("version")?,
    })
}

/// Return the OS type matching `(name, version)`, creating it if needed.
///
/// Empty strings count as missing. A missing or unknown name yields `None`
/// and nothing is created. The unique index on `(name, IFNULL(version, ''))`
/// makes concurrent callers converge on one row.
pub fn get_or_create_os_type(
    conn: &Connection,
    name: Option<&str>,
    version: Option<&str>,
) -> AppResult<Option<OsType>> {
    let Some(os_name) = name
        .filter(|n| !n.trim().is_empty())
        .and_then(OsName::from_reported)
    else {
        return Ok(None);
    };

    let version = version.map(str::trim).filter(|v| !v.is_empty());

    conn.execute(
        "INSERT OR IGNORE INTO os_types (name, version) VALUES (?1, ?2)",
        params![os_name.to_db_str(), version],
    )?;

    let os = conn
        .query_row(
            "SELECT * FROM os_types WHERE name = ?1 AND version IS ?2",
            params![os_name.to_db_str(), version],
            map_os_type,
        )
        .optional()?;
    Ok(os)
}

pub fn os_type_by_id(conn: &Connection, id: i64) -> AppResult<Option<OsType>> {
    let os = conn
        .query_row("SELECT * FROM os_types WHERE id = ?1", [id], map_os_type)
        .optional()?;
    Ok(os)
}
