use chrono::{DateTime, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

/// A location with workstations whose usage can be tracked.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub slug: String,                // ⇔ locations.slug (UNIQUE)
    pub earliest_opening: NaiveTime, // ⇔ locations.earliest_opening ("HH:MM:SS")
    pub latest_closing: NaiveTime,   // ⇔ locations.latest_closing ("HH:MM:SS")
    pub timezone: Tz,                // ⇔ locations.timezone (IANA name)
    pub is_default: bool,            // ⇔ locations.is_default (0/1)
}

impl Location {
    /// Attach the location's time zone to a naive wall-clock timestamp.
    ///
    /// Ambiguous local times (DST fold) resolve to the earliest instant.
    /// Times falling in a DST gap are read with the offset in force before
    /// the gap, which moves them forward by the gap's length.
    pub fn localize(&self, naive: &NaiveDateTime) -> DateTime<Tz> {
        if let Some(dt) = self.timezone.from_local_datetime(naive).earliest() {
            return dt;
        }

        let before_gap = naive
            .checked_sub_signed(TimeDelta::days(1))
            .map(|earlier| {
                self.timezone
                    .offset_from_utc_datetime(&earlier)
                    .fix()
                    .local_minus_utc()
            })
            .unwrap_or(0);
        let utc = naive
            .checked_sub_signed(TimeDelta::seconds(before_gap.into()))
            .unwrap_or(*naive);
        self.timezone.from_utc_datetime(&utc)
    }

    /// Opening hours rendered as "HH:MM-HH:MM".
    pub fn opening_hours(&self) -> String {
        format!(
            "{}-{}",
            self.earliest_opening.format("%H:%M"),
            self.latest_closing.format("%H:%M")
        )
    }
}
