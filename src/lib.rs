//! labtally library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    use cli::commands as cmd;

    match &cli.command {
        Commands::Init => cmd::init::handle(cli),
        Commands::Config { .. } => cmd::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cmd::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cmd::log::handle(&cli.command, cfg),
        Commands::Location { action } => cmd::location::handle(action, cfg),
        Commands::Workstation { action } => cmd::workstation::handle(action, cfg),
        Commands::Layout { action } => cmd::layout::handle(action, cfg),
        Commands::App { action } => cmd::app::handle(action, cfg),
        Commands::Session { action } => cmd::session::handle(action, cfg),
        Commands::Usage { location } => cmd::usage::handle(location.as_deref(), cfg),
        Commands::Info { location } => cmd::info::handle(location.as_deref(), cfg),
        Commands::Activity { .. } => cmd::activity::handle(&cli.command, cfg),
        Commands::Apps { .. } => cmd::apps::handle(&cli.command, cfg),
        Commands::Export { .. } => cmd::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line database override
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
