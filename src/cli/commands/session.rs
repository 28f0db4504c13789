use crate::cli::commands::build_filter;
use crate::cli::parser::SessionCmd;
use crate::config::Config;
use crate::core::account::IgnoredAccounts;
use crate::core::api::{self, CreateSessionRequest, EndSessionRequest, Status};
use crate::core::session::SessionLogic;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date::format_datetime;
use crate::utils::secs2readable;
use crate::utils::table::Table;
use std::collections::HashMap;

fn report(status: Status, ok: &str, failed: &str) -> AppResult<()> {
    if status.is_success() {
        success(format!("{} {ok}", status.code()));
        Ok(())
    } else {
        Err(AppError::BadRequest(failed.to_string()))
    }
}

pub fn handle(action: &SessionCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        SessionCmd::Start {
            mac,
            os,
            os_version,
            user,
        } => {
            let req = CreateSessionRequest {
                mac: mac.clone(),
                os_type: os.clone(),
                os_version: os_version.clone(),
                user: user.clone(),
            };
            let accounts = IgnoredAccounts::from_config(cfg);
            let status = api::create_session(&mut pool.conn, &req, &accounts)?;
            report(
                status,
                "session started",
                "session not started (unknown MAC, invalid OS or ignored account)",
            )
        }

        SessionCmd::End { mac, apps, offset } => {
            let req = EndSessionRequest {
                mac: mac.clone(),
                apps: apps.clone(),
                offset: *offset,
            };
            let status = api::end_session(&mut pool.conn, &req)?;
            report(
                status,
                "session ended",
                "session not ended (unknown MAC, malformed apps, or no valid open session)",
            )
        }

        SessionCmd::List { filter, open } => {
            let (filter, _) = build_filter(&mut pool.conn, filter, false)?;
            let mut sessions = SessionLogic::filter_sessions(&pool.conn, &filter)?;
            if *open {
                sessions.retain(|s| s.is_open());
            }

            if sessions.is_empty() {
                info("No sessions found.");
                return Ok(());
            }

            let mut names: HashMap<i64, String> = HashMap::new();
            let mut table = Table::new(["ID", "WORKSTATION", "START", "END", "DURATION"]);
            for s in &sessions {
                if !names.contains_key(&s.workstation_id) {
                    let name = queries::workstation_by_id(&pool.conn, s.workstation_id)?
                        .map(|w| w.name)
                        .unwrap_or_default();
                    names.insert(s.workstation_id, name);
                }

                table.add_row(vec![
                    s.id.to_string(),
                    names[&s.workstation_id].clone(),
                    format_datetime(&s.start),
                    s.end
                        .as_ref()
                        .map(format_datetime)
                        .unwrap_or_else(|| "open".to_string()),
                    s.duration()
                        .map(|d| secs2readable(d.num_seconds()))
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            print!("{}", table.render());
            println!("{} session(s)", sessions.len());
            Ok(())
        }
    }
}
