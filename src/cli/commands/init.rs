use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command: config directory and file (the file is left
/// alone in test mode), then the lab schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    println!("⚙️  Initializing labtally…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", cfg.database);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        &cfg.database,
        "Lab database initialized",
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    let locations = queries::load_locations(&pool.conn)?;
    if locations.is_empty() {
        info("No locations yet; add one with `labtally location add <NAME> --tz <ZONE>`.");
    } else {
        info(format!("{} location(s) already registered.", locations.len()));
    }

    success("labtally initialization completed!");
    Ok(())
}
