pub mod activity;
pub mod app;
pub mod apps;
pub mod config;
pub mod db;
pub mod export;
pub mod info;
pub mod init;
pub mod layout;
pub mod location;
pub mod log;
pub mod session;
pub mod usage;
pub mod workstation;

use crate::cli::parser::FilterArgs;
use crate::core::filter::SessionFilter;
use crate::core::location::LocationLogic;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::location::Location;
use crate::utils::date::{iso_weekdays, parse_optional_date};
use crate::utils::time::parse_optional_time;
use rusqlite::Connection;

/// Location by slug, or the default location when no slug is given.
pub(crate) fn resolve_location(conn: &mut Connection, slug: Option<&str>) -> AppResult<Location> {
    match slug {
        Some(s) => queries::location_by_slug(conn, s)?
            .ok_or_else(|| AppError::NotFound(format!("location '{s}'"))),
        None => LocationLogic::get_default(conn)?.ok_or_else(|| {
            AppError::NotFound("no locations yet; add one with `labtally location add`".into())
        }),
    }
}

/// Build a session filter from the command-line flags.
///
/// With `require_location` a missing `--location` falls back to the default
/// location; otherwise it leaves every location in.
pub(crate) fn build_filter(
    conn: &mut Connection,
    args: &FilterArgs,
    require_location: bool,
) -> AppResult<(SessionFilter, Option<Location>)> {
    let location = match (&args.location, require_location) {
        (Some(slug), _) => Some(resolve_location(conn, Some(slug))?),
        (None, true) => Some(resolve_location(conn, None)?),
        (None, false) => None,
    };

    let filter = SessionFilter {
        location_id: location.as_ref().map(|l| l.id),
        start_date: parse_optional_date(args.from.as_ref())?,
        end_date: parse_optional_date(args.to.as_ref())?,
        start_time: parse_optional_time(args.after.as_ref())?,
        end_time: parse_optional_time(args.before.as_ref())?,
        weekdays: iso_weekdays(&args.weekday)?,
    };

    Ok((filter, location))
}

/// Serialize a boundary payload, or fail with a bad request.
pub(crate) fn print_payload<T: serde::Serialize>(payload: Option<T>, what: &str) -> AppResult<()> {
    let Some(payload) = payload else {
        return Err(AppError::BadRequest(what.to_string()));
    };

    let json = serde_json::to_string_pretty(&payload)
        .map_err(|e| AppError::Other(format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}
