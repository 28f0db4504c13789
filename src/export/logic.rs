use crate::core::filter::SessionFilter;
use crate::core::session::SessionLogic;
use crate::db::{applications, queries};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::SessionExport;
use crate::models::session::Session;
use crate::ui::messages::warning;
use crate::utils::date::format_datetime;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the sessions matching `filter` to `file` (absolute path).
    /// Returns the number of exported sessions.
    pub fn export(
        conn: &Connection,
        format: ExportFormat,
        file: &str,
        filter: &SessionFilter,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows = Self::load_sessions(conn, filter)?;

        if rows.is_empty() {
            warning("No sessions found for the selected filters.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }

    /// Sessions matching the filter, resolved to names.
    pub fn load_sessions(
        conn: &Connection,
        filter: &SessionFilter,
    ) -> AppResult<Vec<SessionExport>> {
        let sessions = SessionLogic::filter_sessions(conn, filter)?;

        let app_names: HashMap<i64, String> = applications::load_applications(conn)?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();
        let mut names = NameCache::default();

        let mut out = Vec::with_capacity(sessions.len());
        for s in sessions {
            let (workstation, location) = names.workstation(conn, s.workstation_id)?;
            let os = names.os(conn, s.os_type_id)?;

            let applications = applications::usage_for_session(conn, s.id)?
                .iter()
                .map(|u| {
                    let name = app_names
                        .get(&u.application_id)
                        .map(String::as_str)
                        .unwrap_or("?");
                    format!("{name}={}", u.duration)
                })
                .collect::<Vec<_>>()
                .join(";");

            out.push(to_export(&s, workstation, location, os, applications));
        }

        Ok(out)
    }
}

fn to_export(
    s: &Session,
    workstation: String,
    location: String,
    os: String,
    applications: String,
) -> SessionExport {
    SessionExport {
        id: s.id,
        location,
        workstation,
        os,
        start: format_datetime(&s.start),
        end: s.end.as_ref().map(format_datetime),
        duration: s.duration().map(|d| d.num_seconds()),
        applications,
    }
}

/// Workstation, location and OS names looked up once per id.
#[derive(Default)]
struct NameCache {
    workstations: HashMap<i64, (String, String)>,
    locations: HashMap<i64, String>,
    os_types: HashMap<i64, String>,
}

impl NameCache {
    fn workstation(&mut self, conn: &Connection, id: i64) -> AppResult<(String, String)> {
        if let Some(hit) = self.workstations.get(&id) {
            return Ok(hit.clone());
        }

        let ws = queries::workstation_by_id(conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("workstation {id}")))?;

        let location = match self.locations.get(&ws.location_id) {
            Some(slug) => slug.clone(),
            None => {
                let slug = queries::location_by_id(conn, ws.location_id)?
                    .map(|l| l.slug)
                    .unwrap_or_default();
                self.locations.insert(ws.location_id, slug.clone());
                slug
            }
        };

        let entry = (ws.name, location);
        self.workstations.insert(id, entry.clone());
        Ok(entry)
    }

    fn os(&mut self, conn: &Connection, id: i64) -> AppResult<String> {
        if let Some(hit) = self.os_types.get(&id) {
            return Ok(hit.clone());
        }

        let label = queries::os_type_by_id(conn, id)?
            .map(|o| o.to_string())
            .unwrap_or_default();
        self.os_types.insert(id, label.clone());
        Ok(label)
    }
}
