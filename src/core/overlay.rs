//! Layout grids with per-workstation data laid over the cells.

use crate::core::filter::{SessionFilter, workstation_alias};
use crate::db::layout;
use crate::errors::AppResult;
use crate::models::layout::{CellOverlay, LayoutCell, LayoutRow, OverlaidCell, OverlayPoint};
use crate::models::location::Location;
use crate::utils::secs2readable;
use rusqlite::{Connection, params_from_iter};
use std::collections::HashMap;
use std::rc::Rc;

/// What an overlay dataset measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Number of sessions per workstation.
    Sessions,
    /// Total closed-session time per workstation.
    Time,
}

/// Cells of one row, annotated with overlay data as they are iterated.
pub struct OverlaidCells {
    cells: std::vec::IntoIter<LayoutCell>,
    overlay: Rc<HashMap<i64, CellOverlay>>,
}

impl Iterator for OverlaidCells {
    type Item = OverlaidCell;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cells.next()?;
        let overlay = cell
            .workstation_id
            .and_then(|id| self.overlay.get(&id).cloned());

        Some(OverlaidCell { cell, overlay })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

pub struct OverlaidRow {
    pub row: LayoutRow,
    pub cells: OverlaidCells,
}

/// Index overlay points by workstation. Points with a zero value carry no
/// information and are left out, so their cells stay blank.
pub fn overlay_by_workstation(points: &[OverlayPoint]) -> HashMap<i64, CellOverlay> {
    points
        .iter()
        .filter(|p| p.value != 0.0)
        .map(|p| {
            (
                p.workstation_id,
                CellOverlay {
                    data: p.label.clone(),
                    intensity: p.percent,
                },
            )
        })
        .collect()
}

pub struct OverlayLogic;

impl OverlayLogic {
    /// Rows of the location's layout, in order, each with its ordered cells.
    ///
    /// A cell gets an overlay only when it holds a workstation present in
    /// `overlay`. Intensities are taken as given.
    pub fn overlaid_rows(
        conn: &Connection,
        location: &Location,
        overlay: Option<&[OverlayPoint]>,
    ) -> AppResult<Vec<OverlaidRow>> {
        let lookup = Rc::new(overlay.map(overlay_by_workstation).unwrap_or_default());

        let mut out = Vec::new();
        for row in layout::rows_for_location(conn, location.id)? {
            let cells = layout::cells_for_row(conn, row.id)?;
            out.push(OverlaidRow {
                row,
                cells: OverlaidCells {
                    cells: cells.into_iter(),
                    overlay: Rc::clone(&lookup),
                },
            });
        }
        Ok(out)
    }

    /// Build an overlay dataset from the sessions matching `filter`.
    ///
    /// Percentages are relative to the busiest workstation.
    pub fn plot(
        conn: &Connection,
        filter: &SessionFilter,
        kind: OverlayKind,
    ) -> AppResult<Vec<OverlayPoint>> {
        let ws = workstation_alias(None);
        let measure = match kind {
            OverlayKind::Sessions => "COUNT(sessions.id)",
            OverlayKind::Time => {
                "IFNULL(SUM(strftime('%s', sessions.end_ts) - strftime('%s', sessions.start_ts)), 0)"
            }
        };

        let f = filter.build(None);
        let sql = format!(
            "SELECT {ws}.id, {measure}
             FROM sessions JOIN workstations AS {ws} ON {ws}.id = sessions.workstation_id
             WHERE {}
             GROUP BY {ws}.id",
            f.where_clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(f.params()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut values = Vec::new();
        for r in rows {
            values.push(r?);
        }

        let max = values.iter().map(|(_, v)| *v).max().unwrap_or(0);

        Ok(values
            .into_iter()
            .map(|(workstation_id, value)| OverlayPoint {
                workstation_id,
                value: value as f64,
                label: match kind {
                    OverlayKind::Sessions => value.to_string(),
                    OverlayKind::Time => secs2readable(value),
                },
                percent: percent_of(value, max),
            })
            .collect())
    }
}

/// `value` as a 0..=100 share of `max`, rounded.
fn percent_of(value: i64, max: i64) -> u8 {
    if max <= 0 {
        return 0;
    }
    ((value.max(0) as f64 * 100.0 / max as f64).round() as i64).clamp(0, 100) as u8
}
