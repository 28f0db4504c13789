//! Registry writes: locations, workstations with their NICs, layout grid
//! and application name mappings. Every write is recorded in the log.

use crate::db::log::ttlog;
use crate::db::{applications, layout, queries};
use crate::errors::{AppError, AppResult};
use crate::models::application::Application;
use crate::models::layout::LayoutRow;
use crate::models::location::Location;
use crate::models::mac_address::{MacAddress, NicType};
use crate::models::workstation::Workstation;
use crate::utils::slug::unique_slug;
use chrono::NaiveTime;
use chrono_tz::Tz;
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashSet;

pub struct RegistryLogic;

impl RegistryLogic {
    /// Create a location; its slug is derived from the name and made unique.
    pub fn add_location(
        conn: &Connection,
        name: &str,
        opens: NaiveTime,
        closes: NaiveTime,
        timezone: Tz,
    ) -> AppResult<Location> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("location name is empty".into()));
        }

        let taken: HashSet<String> = queries::load_locations(conn)?
            .into_iter()
            .map(|l| l.slug)
            .collect();
        let slug = unique_slug(name, |s| taken.contains(s));

        let id = queries::insert_location(conn, name, &slug, opens, closes, timezone)?;
        ttlog(
            conn,
            "add",
            &slug,
            &format!("Location '{name}' created ({})", timezone.name()),
        )?;

        queries::location_by_id(conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("location {id}")))
    }

    /// Create a workstation and register its MAC addresses.
    ///
    /// Addresses are validated before anything is written; a bad or already
    /// registered address leaves the registry unchanged.
    pub fn add_workstation(
        conn: &mut Connection,
        location: &Location,
        name: &str,
        track: bool,
        macs: &[(String, NicType)],
    ) -> AppResult<Workstation> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("workstation name is empty".into()));
        }

        for (raw, _) in macs {
            if MacAddress::normalize(raw).is_none() {
                return Err(AppError::InvalidMac(raw.clone()));
            }
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = queries::insert_workstation(&tx, location.id, name, track)?;
        for (raw, nic) in macs {
            queries::insert_mac(&tx, id, raw, *nic)?;
        }

        ttlog(
            &tx,
            "add",
            name,
            &format!(
                "Workstation added to '{}' with {} NIC(s){}",
                location.slug,
                macs.len(),
                if track { "" } else { ", not tracked" }
            ),
        )?;

        let ws = queries::workstation_by_id(&tx, id)?
            .ok_or_else(|| AppError::NotFound(format!("workstation {id}")))?;
        tx.commit()?;

        Ok(ws)
    }

    /// Append an empty row to the location's layout.
    pub fn add_layout_row(conn: &Connection, location: &Location) -> AppResult<LayoutRow> {
        let row = layout::append_row(conn, location.id)?;
        ttlog(
            conn,
            "add",
            &location.slug,
            &format!("Layout row {} added", row.human_order()),
        )?;
        Ok(row)
    }

    /// Append a cell to the row with the given 1-indexed number.
    ///
    /// With a workstation name the cell shows that workstation, which must
    /// belong to the same location; without one it is a spacer.
    pub fn add_layout_cell(
        conn: &Connection,
        location: &Location,
        row_number: u32,
        workstation: Option<&str>,
    ) -> AppResult<i64> {
        let row = row_number
            .checked_sub(1)
            .map(|order| layout::row_by_order(conn, location.id, order))
            .transpose()?
            .flatten()
            .ok_or_else(|| {
                AppError::NotFound(format!("row {row_number} in '{}'", location.slug))
            })?;

        let ws_id = match workstation {
            Some(name) => Some(
                queries::workstation_by_name(conn, location.id, name)?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("workstation '{name}' in '{}'", location.slug))
                    })?
                    .id,
            ),
            None => None,
        };

        let id = layout::append_cell(conn, row.id, ws_id)?;
        ttlog(
            conn,
            "add",
            &location.slug,
            &format!(
                "Layout cell added to row {} ({})",
                row.human_order(),
                workstation.unwrap_or("spacer")
            ),
        )?;
        Ok(id)
    }

    /// Make each reported name count as `canonical` at the location.
    /// Without reported names the canonical name maps onto itself.
    pub fn map_application(
        conn: &mut Connection,
        location: &Location,
        canonical: &str,
        reported: &[String],
    ) -> AppResult<Application> {
        let canonical = canonical.trim();
        if canonical.is_empty() {
            return Err(AppError::BadRequest("application name is empty".into()));
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let app = applications::get_or_create_application(&tx, canonical)?;

        let mut names: Vec<&str> = reported
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        names.sort_unstable();
        names.dedup();
        if names.is_empty() {
            names.push(canonical);
        }

        for name in &names {
            applications::map_reported_name(&tx, name, app.id, location.id)?;
        }

        ttlog(
            &tx,
            "add",
            &location.slug,
            &format!("Application '{}' mapped from {} name(s)", app.name, names.len()),
        )?;
        tx.commit()?;

        Ok(app)
    }
}
