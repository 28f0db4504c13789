use crate::cli::commands::{print_payload, resolve_location};
use crate::config::Config;
use crate::core::api;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(location: Option<&str>, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;
    let slug = match location {
        Some(s) => s.to_string(),
        None => resolve_location(&mut pool.conn, None)?.slug,
    };

    let usage = api::current_usage(&pool.conn, &slug)?;
    print_payload(usage, &format!("unknown location '{slug}'"))
}
