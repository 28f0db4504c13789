use serde::Serialize;

/// Flat view of a session for export.
#[derive(Serialize, Clone, Debug)]
pub struct SessionExport {
    pub id: i64,
    pub location: String,
    pub workstation: String,
    pub os: String,
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<i64>, // seconds
    /// `name=seconds` pairs joined with `;`.
    pub applications: String,
}
