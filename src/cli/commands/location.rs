use crate::cli::commands::resolve_location;
use crate::cli::parser::LocationCmd;
use crate::config::Config;
use crate::core::location::LocationLogic;
use crate::core::registry::RegistryLogic;
use crate::core::session::SessionLogic;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date::format_date;
use crate::utils::table::Table;
use crate::utils::time::parse_time;
use chrono_tz::Tz;

pub fn handle(action: &LocationCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        LocationCmd::Add {
            name,
            opens,
            closes,
            tz,
        } => {
            let opens_str = opens.as_deref().unwrap_or(&cfg.default_opening);
            let closes_str = closes.as_deref().unwrap_or(&cfg.default_closing);
            let tz_str = tz.as_deref().unwrap_or(&cfg.default_timezone);

            let opens =
                parse_time(opens_str).ok_or_else(|| AppError::InvalidTime(opens_str.into()))?;
            let closes =
                parse_time(closes_str).ok_or_else(|| AppError::InvalidTime(closes_str.into()))?;
            let timezone: Tz = tz_str
                .parse()
                .map_err(|_| AppError::InvalidTimezone(tz_str.into()))?;

            let location = RegistryLogic::add_location(&pool.conn, name, opens, closes, timezone)?;
            success(format!(
                "Location '{}' added (slug: {}, hours {}, {})",
                location.name,
                location.slug,
                location.opening_hours(),
                location.timezone.name()
            ));
        }

        LocationCmd::List => {
            // repairs the flag before it is displayed
            LocationLogic::get_default(&mut pool.conn)?;

            let locations = queries::load_locations(&pool.conn)?;
            if locations.is_empty() {
                info("No locations yet.");
                return Ok(());
            }

            let mut table = Table::new([
                "",
                "SLUG",
                "NAME",
                "HOURS",
                "TIME ZONE",
                "WORKSTATIONS",
                "FIRST SESSION",
            ]);
            for l in &locations {
                let first = SessionLogic::first_session_date_for_location(&pool.conn, l.id)?
                    .map(|d| format_date(&d))
                    .unwrap_or_else(|| "-".to_string());

                table.add_row(vec![
                    if l.is_default { "*" } else { "" }.to_string(),
                    l.slug.clone(),
                    l.name.clone(),
                    l.opening_hours(),
                    l.timezone.name().to_string(),
                    LocationLogic::total_workstation_count(&pool.conn, l)?.to_string(),
                    first,
                ]);
            }
            print!("{}", table.render());
        }

        LocationCmd::Default { slug } => match slug {
            Some(s) => {
                let location = resolve_location(&mut pool.conn, Some(s))?;
                LocationLogic::set_default(&mut pool.conn, location.id)?;
                success(format!("Default location is now '{}'", location.slug));
            }
            None => {
                let location = resolve_location(&mut pool.conn, None)?;
                info(format!(
                    "Default location: {} ({})",
                    location.name, location.slug
                ));
            }
        },
    }

    Ok(())
}
