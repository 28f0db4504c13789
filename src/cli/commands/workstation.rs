use crate::cli::commands::resolve_location;
use crate::cli::parser::WorkstationCmd;
use crate::config::Config;
use crate::core::registry::RegistryLogic;
use crate::core::session::SessionLogic;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::mac_address::NicType;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

/// `AA:BB:CC:DD:EE:FF` or `AA:BB:CC:DD:EE:FF=wireless`; ethernet by default.
fn parse_mac_arg(arg: &str) -> AppResult<(String, NicType)> {
    match arg.rsplit_once('=') {
        Some((addr, nic)) => {
            let nic = NicType::from_code(nic.trim())
                .ok_or_else(|| AppError::InvalidNic(nic.to_string()))?;
            Ok((addr.trim().to_string(), nic))
        }
        None => Ok((arg.trim().to_string(), NicType::Ethernet)),
    }
}

pub fn handle(action: &WorkstationCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        WorkstationCmd::Add {
            name,
            location,
            mac,
            no_track,
        } => {
            let location = resolve_location(&mut pool.conn, location.as_deref())?;
            let macs = mac
                .iter()
                .map(|m| parse_mac_arg(m))
                .collect::<AppResult<Vec<_>>>()?;

            let ws =
                RegistryLogic::add_workstation(&mut pool.conn, &location, name, !*no_track, &macs)?;
            success(format!(
                "Workstation '{}' added to '{}' with {} NIC(s)",
                ws.name,
                location.slug,
                macs.len()
            ));
        }

        WorkstationCmd::List { location, all } => {
            let location = resolve_location(&mut pool.conn, location.as_deref())?;
            let workstations = queries::workstations_for_location(&pool.conn, location.id, !*all)?;

            if workstations.is_empty() {
                info(format!("No workstations in '{}'.", location.slug));
                return Ok(());
            }

            let mut table = Table::new(["NAME", "TRACK", "MAC ADDRESSES", "SESSION START"]);
            for ws in &workstations {
                let macs = queries::macs_for_workstation(&pool.conn, ws.id)?
                    .iter()
                    .map(|m| {
                        format!(
                            "{} ({})",
                            m.address_with_separators(&cfg.mac_separator),
                            m.nic.to_db_str()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");

                let active = SessionLogic::active_session_for_workstation(&pool.conn, ws.id)?
                    .map(|s| location.localize(&s.start).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());

                table.add_row(vec![
                    ws.name.clone(),
                    if ws.track { "yes" } else { "no" }.to_string(),
                    macs,
                    active,
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_argument_with_and_without_nic() {
        let (addr, nic) = parse_mac_arg("aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(addr, "aa:bb:cc:dd:ee:ff");
        assert_eq!(nic, NicType::Ethernet);

        let (_, nic) = parse_mac_arg("aa:bb:cc:dd:ee:ff=Wireless").unwrap();
        assert_eq!(nic, NicType::Wireless);

        assert!(parse_mac_arg("aa:bb:cc:dd:ee:ff=bluetooth").is_err());
    }
}
