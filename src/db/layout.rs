//! Layout rows and cells of a location.

use crate::errors::AppResult;
use crate::models::layout::{LayoutCell, LayoutRow};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<LayoutRow> {
    Ok(LayoutRow {
        id: row.get("id")?,
        location_id: row.get("location_id")?,
        order: row.get("sort_order")?,
    })
}

fn map_cell(row: &Row) -> Result<LayoutCell> {
    Ok(LayoutCell {
        id: row.get("id")?,
        row_id: row.get("row_id")?,
        workstation_id: row.get("workstation_id")?,
        workstation_name: row.get("workstation_name")?,
        order: row.get("sort_order")?,
    })
}

/// Append a row after the last one of the location.
pub fn append_row(conn: &Connection, location_id: i64) -> AppResult<LayoutRow> {
    let order: u32 = conn.query_row(
        "SELECT IFNULL(MAX(sort_order) + 1, 0) FROM layout_rows WHERE location_id = ?1",
        [location_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO layout_rows (location_id, sort_order) VALUES (?1, ?2)",
        params![location_id, order],
    )?;

    Ok(LayoutRow {
        id: conn.last_insert_rowid(),
        location_id,
        order,
    })
}

/// Append a cell at the end of a row. `None` leaves an empty spacer cell.
pub fn append_cell(
    conn: &Connection,
    row_id: i64,
    workstation_id: Option<i64>,
) -> AppResult<i64> {
    let order: u32 = conn.query_row(
        "SELECT IFNULL(MAX(sort_order) + 1, 0) FROM layout_cells WHERE row_id = ?1",
        [row_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO layout_cells (row_id, workstation_id, sort_order) VALUES (?1, ?2, ?3)",
        params![row_id, workstation_id, order],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Rows of a location ordered by their user-defined order.
pub fn rows_for_location(conn: &Connection, location_id: i64) -> AppResult<Vec<LayoutRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM layout_rows WHERE location_id = ?1 ORDER BY sort_order ASC, id ASC",
    )?;
    let rows = stmt.query_map([location_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Row by its 0-indexed order.
pub fn row_by_order(
    conn: &Connection,
    location_id: i64,
    order: u32,
) -> AppResult<Option<LayoutRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM layout_rows WHERE location_id = ?1 AND sort_order = ?2",
            params![location_id, order],
            map_row,
        )
        .optional()?;
    Ok(row)
}

/// All cells for a row, ordered, with the linked workstation's name.
pub fn cells_for_row(conn: &Connection, row_id: i64) -> AppResult<Vec<LayoutCell>> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.id, c.row_id, c.workstation_id, c.sort_order, w.name AS workstation_name
         FROM layout_cells c
         LEFT JOIN workstations w ON w.id = c.workstation_id
         WHERE c.row_id = ?1
         ORDER BY c.sort_order ASC, c.id ASC",
    )?;
    let rows = stmt.query_map([row_id], map_cell)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
