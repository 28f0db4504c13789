//! Location-level operations: default resolution and occupancy counts.

use crate::core::session::SessionLogic;
use crate::db::log::ttlog;
use crate::db::queries::{self, map_location};
use crate::errors::AppResult;
use crate::models::location::Location;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashSet;

/// Alphabetical by name (case-insensitive), ties broken by creation order.
const NAME_ORDER: &str = "name COLLATE NOCASE ASC, name ASC, id ASC";

pub struct LocationLogic;

impl LocationLogic {
    /// Return the default location, repairing the flag when needed.
    ///
    /// Exactly one flagged location is returned as is. With none flagged, or
    /// several, all flags are cleared and the alphabetically first location
    /// becomes the default. `None` only when no location exists.
    pub fn get_default(conn: &mut Connection) -> AppResult<Option<Location>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let flagged: Vec<Location> = {
            let mut stmt = tx.prepare("SELECT * FROM locations WHERE is_default = 1")?;
            let rows = stmt.query_map([], map_location)?;

            let mut v = Vec::new();
            for r in rows {
                v.push(r?);
            }
            v
        };

        if flagged.len() == 1 {
            tx.commit()?;
            return Ok(flagged.into_iter().next());
        }

        if flagged.len() > 1 {
            tx.execute("UPDATE locations SET is_default = 0 WHERE is_default = 1", [])?;
        }

        let first = tx
            .query_row(
                &format!("SELECT * FROM locations ORDER BY {NAME_ORDER} LIMIT 1"),
                [],
                map_location,
            )
            .optional()?;

        let Some(mut location) = first else {
            tx.commit()?;
            return Ok(None);
        };

        tx.execute(
            "UPDATE locations SET is_default = 1 WHERE id = ?1",
            [location.id],
        )?;
        ttlog(
            &tx,
            "default",
            &location.slug,
            &format!(
                "Default location repaired ({} flagged before)",
                flagged.len()
            ),
        )?;
        tx.commit()?;

        location.is_default = true;
        Ok(Some(location))
    }

    /// Make `location_id` the only default location.
    pub fn set_default(conn: &mut Connection, location_id: i64) -> AppResult<()> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("UPDATE locations SET is_default = 0 WHERE is_default = 1", [])?;
        tx.execute(
            "UPDATE locations SET is_default = 1 WHERE id = ?1",
            [location_id],
        )?;
        ttlog(&tx, "default", &location_id.to_string(), "Default location set")?;
        tx.commit()?;
        Ok(())
    }

    /// The total number of tracked workstations at the location.
    pub fn total_workstation_count(conn: &Connection, location: &Location) -> AppResult<i64> {
        queries::total_workstation_count(conn, location.id)
    }

    /// The number of tracked workstations without an open session.
    pub fn open_workstation_count(conn: &Connection, location: &Location) -> AppResult<i64> {
        let total = Self::total_workstation_count(conn, location)?;
        let busy: HashSet<i64> = SessionLogic::open_for_location(conn, location.id)?
            .iter()
            .map(|s| s.workstation_id)
            .collect();
        Ok((total - busy.len() as i64).max(0))
    }
}
