use crate::cli::commands::{print_payload, resolve_location};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::api;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Activity {
        location,
        start,
        end,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;
        let slug = match location {
            Some(s) => s.clone(),
            None => resolve_location(&mut pool.conn, None)?.slug,
        };

        let activity =
            api::location_activity(&pool.conn, &slug, start.as_deref(), end.as_deref())?;
        print_payload(
            activity,
            &format!("unknown location '{slug}' or malformed datetime"),
        )?;
    }

    Ok(())
}
