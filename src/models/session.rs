use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A record of a workstation's usage.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub workstation_id: i64,
    pub os_type_id: i64,
    pub start: NaiveDateTime,          // ⇔ sessions.start_ts ("YYYY-MM-DD HH:MM:SS.ffffff")
    pub start_date: NaiveDate,         // ⇔ sessions.start_date
    pub start_time: NaiveTime,         // ⇔ sessions.start_time
    pub end: Option<NaiveDateTime>,    // NULL while the session is open
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Length of a closed session.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}
