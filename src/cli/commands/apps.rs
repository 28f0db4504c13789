use crate::cli::commands::build_filter;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::usage::UsageLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::utils::secs2readable;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Apps { filter, json } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let (filter, _) = build_filter(&mut pool.conn, filter, false)?;
        let totals = UsageLogic::usage_totals(&pool.conn, &filter)?;

        if *json {
            let out = serde_json::to_string_pretty(&totals)
                .map_err(|e| AppError::Other(format!("JSON serialization error: {e}")))?;
            println!("{out}");
            return Ok(());
        }

        if totals.is_empty() {
            info("No application usage recorded for the selected filters.");
            return Ok(());
        }

        let mut table = Table::new(["APPLICATION", "SESSIONS", "TOTAL", "SECONDS"]);
        for t in &totals {
            table.add_row(vec![
                t.application.clone(),
                t.sessions.to_string(),
                secs2readable(t.duration),
                t.duration.to_string(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
