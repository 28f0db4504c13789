use crate::cli::commands::{build_filter, resolve_location};
use crate::cli::parser::LayoutCmd;
use crate::config::Config;
use crate::core::overlay::OverlayLogic;
use crate::core::registry::RegistryLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::layout::OverlaidCell;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, color_for_intensity};
use crate::utils::formatting::bold;
use serde::Serialize;

#[derive(Serialize)]
struct RowView {
    row: u32,
    cells: Vec<OverlaidCell>,
}

fn render_cell(c: &OverlaidCell, width: usize) -> String {
    if !c.cell.is_workstation() {
        return format!("[{}]", " ".repeat(width));
    }
    let name = c.cell.workstation_name.as_deref().unwrap_or("?");

    match &c.overlay {
        Some(o) => {
            let text = format!("{name} {}", o.data);
            format!(
                "[{}{:<width$}{}]",
                color_for_intensity(o.intensity),
                text,
                RESET
            )
        }
        None => format!("[{GREY}{name:<width$}{RESET}]"),
    }
}

pub fn handle(action: &LayoutCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        LayoutCmd::AddRow { location } => {
            let location = resolve_location(&mut pool.conn, location.as_deref())?;
            let row = RegistryLogic::add_layout_row(&pool.conn, &location)?;
            success(format!(
                "Row {} added to '{}'",
                row.human_order(),
                location.slug
            ));
        }

        LayoutCmd::AddCell {
            location,
            row,
            workstation,
        } => {
            let location = resolve_location(&mut pool.conn, location.as_deref())?;
            RegistryLogic::add_layout_cell(&pool.conn, &location, *row, workstation.as_deref())?;
            success(format!(
                "Cell added to row {} of '{}' ({})",
                row,
                location.slug,
                workstation.as_deref().unwrap_or("spacer")
            ));
        }

        LayoutCmd::Show {
            filter,
            overlay,
            json,
        } => {
            let (filter, location) = build_filter(&mut pool.conn, filter, true)?;
            let location =
                location.ok_or_else(|| AppError::NotFound("location for layout".into()))?;

            let points = match overlay {
                Some(kind) => Some(OverlayLogic::plot(&pool.conn, &filter, (*kind).into())?),
                None => None,
            };

            let rows: Vec<RowView> =
                OverlayLogic::overlaid_rows(&pool.conn, &location, points.as_deref())?
                    .into_iter()
                    .map(|r| RowView {
                        row: r.row.human_order(),
                        cells: r.cells.collect(),
                    })
                    .collect();

            if *json {
                let out = serde_json::to_string_pretty(&rows)
                    .map_err(|e| AppError::Other(format!("JSON serialization error: {e}")))?;
                println!("{out}");
                return Ok(());
            }

            if rows.is_empty() {
                info(format!("'{}' has no layout yet.", location.slug));
                return Ok(());
            }

            let width = rows
                .iter()
                .flat_map(|r| r.cells.iter())
                .map(|c| {
                    let name = c.cell.workstation_name.as_deref().unwrap_or("");
                    match &c.overlay {
                        Some(o) => name.chars().count() + 1 + o.data.chars().count(),
                        None => name.chars().count(),
                    }
                })
                .max()
                .unwrap_or(0)
                .max(3);

            println!("🗺️  {} ({})\n", bold(&location.name), location.slug);
            for r in &rows {
                let cells: Vec<String> = r.cells.iter().map(|c| render_cell(c, width)).collect();
                println!("{:>3} {}", r.row, cells.join(" "));
            }
        }
    }

    Ok(())
}
