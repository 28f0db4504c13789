use crate::cli::commands::build_filter;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        filter,
        force,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;
        let (filter, _) = build_filter(&mut pool.conn, filter, false)?;
        ExportLogic::export(&pool.conn, *format, file, &filter, *force)?;
    }
    Ok(())
}
