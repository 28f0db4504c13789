use crate::db::log::{LogEntry, load_entries};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const MAX_TARGET: usize = 40;

/// ANSI colour for an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" => Colour::Green,
        "end" => Colour::Cyan,
        "discard" => Colour::Red,
        "default" => Colour::Yellow,
        "add" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Migrations store SQLite's `datetime('now')`, everything else RFC 3339.
fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(
        pool: &mut DbPool,
        operation: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<()> {
        let entries = load_entries(&pool.conn, operation, limit)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let op_w = entries
            .iter()
            .map(|e| e.operation.len())
            .max()
            .unwrap_or(1);
        let target_w = entries
            .iter()
            .map(|e| shorten(&e.target, MAX_TARGET).chars().count())
            .max()
            .unwrap_or(0);

        println!("📜 Internal log:\n");

        for LogEntry {
            id,
            date,
            operation,
            target,
            message,
        } in &entries
        {
            // pad before painting, escape codes have no width
            let op = color_for_operation(operation).paint(format!("{operation:<op_w$}"));
            println!(
                "{:>id_w$}: {} | {} {:<target_w$} => {}",
                id,
                display_date(date),
                op,
                shorten(target, MAX_TARGET),
                message,
            );
        }

        Ok(())
    }
}
