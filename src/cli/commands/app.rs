use crate::cli::commands::resolve_location;
use crate::cli::parser::AppCmd;
use crate::config::Config;
use crate::core::registry::RegistryLogic;
use crate::db::applications;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(action: &AppCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        AppCmd::Add {
            name,
            location,
            reported,
        } => {
            let location = resolve_location(&mut pool.conn, location.as_deref())?;
            let app = RegistryLogic::map_application(&mut pool.conn, &location, name, reported)?;
            let names = applications::reported_names(&pool.conn, app.id, location.id)?;
            success(format!(
                "Application '{}' at '{}' reported as: {}",
                app.name,
                location.slug,
                names.join(", ")
            ));
        }

        AppCmd::List { location } => {
            let location = resolve_location(&mut pool.conn, location.as_deref())?;

            let mut table = Table::new(["APPLICATION", "REPORTED AS"]);
            for app in applications::load_applications(&pool.conn)? {
                let names = applications::reported_names(&pool.conn, app.id, location.id)?;
                if names.is_empty() {
                    continue;
                }
                table.add_row(vec![app.name, names.join(", ")]);
            }

            if table.is_empty() {
                info(format!("No applications mapped in '{}'.", location.slug));
            } else {
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
