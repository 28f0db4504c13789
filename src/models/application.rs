//! Canonical applications and the names under which clients report them.
//!
//! PowerPoint might be reported as "Microsoft PowerPoint" or "PowerPoint";
//! two `ReportedApplication` rows pointing at one `Application` make both
//! names count as the same program. Reported names are scoped per location.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportedApplication {
    pub id: i64,
    pub name: String,
    pub application_id: i64,
    pub location_id: i64,
}

/// Accumulated use of one application during one session.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationUse {
    pub id: i64,
    pub application_id: i64,
    pub session_id: i64,
    pub duration: i64, // seconds
}

/// Per-application aggregate over a filtered set of sessions.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationTotal {
    pub application: String,
    pub sessions: i64,
    pub duration: i64, // seconds
}
