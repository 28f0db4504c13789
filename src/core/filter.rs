//! Composable session predicates for reporting queries.
//!
//! Fields are addressed as relation paths (`workstation__track`,
//! `start_date`). A path renders as `alias.column`, the alias being every
//! segment but the last, so the same predicates work on `sessions` joined
//! to `workstations AS workstation`, or, with the prefix `session`, on
//! `application_uses` joined to `sessions AS session` and
//! `workstations AS session__workstation`.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rusqlite::types::Value;

use crate::utils::date::format_date;
use crate::utils::time::format_time;

/// Render a relation path as a column reference.
///
/// `column(None, "start_date")` → `start_date`
/// `column(Some("session"), "workstation__track")` → `session__workstation.track`
pub fn column(prefix: Option<&str>, path: &str) -> String {
    let full = match prefix {
        Some(p) => format!("{p}__{path}"),
        None => path.to_string(),
    };

    match full.rsplit_once("__") {
        Some((alias, col)) => format!("{alias}.{col}"),
        None => full,
    }
}

/// Alias under which the workstation table must be joined for `prefix`.
pub fn workstation_alias(prefix: Option<&str>) -> String {
    match prefix {
        Some(p) => format!("{p}__workstation"),
        None => "workstation".to_string(),
    }
}

/// Day number used by the weekday predicate: 1 = Sunday .. 7 = Saturday.
///
/// Monday → 2, Sunday → 1. Matches `strftime('%w', ts) + 1`.
pub fn internal_weekday(day: Weekday) -> u32 {
    day.number_from_monday() % 7 + 1
}

/// A single SQL condition with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    sql: String,
    params: Vec<Value>,
}

impl Predicate {
    fn compare(prefix: Option<&str>, path: &str, op: &str, value: Value) -> Self {
        Self {
            sql: format!("{} {} ?", column(prefix, path), op),
            params: vec![value],
        }
    }

    fn weekday(prefix: Option<&str>, day: Weekday) -> Self {
        Self {
            sql: format!(
                "CAST(strftime('%w', {}) AS INTEGER) + 1 = ?",
                column(prefix, "start_ts")
            ),
            params: vec![Value::Integer(internal_weekday(day) as i64)],
        }
    }

    /// Disjunction of `preds`; `None` when there is nothing to join.
    fn any(preds: Vec<Predicate>) -> Option<Self> {
        if preds.is_empty() {
            return None;
        }

        let sql = preds
            .iter()
            .map(|p| p.sql.as_str())
            .collect::<Vec<_>>()
            .join(" OR ");
        let params = preds.into_iter().flat_map(|p| p.params).collect();

        Some(Self {
            sql: format!("({sql})"),
            params,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Conjunction of predicates, rendered once into a WHERE clause.
#[derive(Debug, Clone, Default)]
pub struct SqlFilter {
    predicates: Vec<Predicate>,
}

impl SqlFilter {
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// `a AND b AND ...`, or `1` when empty.
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            return "1".to_string();
        }

        self.predicates
            .iter()
            .map(|p| p.sql.as_str())
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.predicates.iter().flat_map(|p| p.params.iter())
    }
}

/// Date / time / weekday window over sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub location_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Matches sessions starting on ANY of these days.
    pub weekdays: Vec<Weekday>,
}

impl SessionFilter {
    pub fn for_location(location_id: i64) -> Self {
        Self {
            location_id: Some(location_id),
            ..Self::default()
        }
    }

    /// Build the predicate list, addressing session fields through `prefix`.
    pub fn build(&self, prefix: Option<&str>) -> SqlFilter {
        let mut predicates = vec![Predicate::compare(
            prefix,
            "workstation__track",
            "=",
            Value::Integer(1),
        )];

        if let Some(id) = self.location_id {
            predicates.push(Predicate::compare(
                prefix,
                "workstation__location_id",
                "=",
                Value::Integer(id),
            ));
        }
        if let Some(d) = &self.start_date {
            predicates.push(Predicate::compare(
                prefix,
                "start_date",
                ">=",
                Value::Text(format_date(d)),
            ));
        }
        if let Some(d) = &self.end_date {
            predicates.push(Predicate::compare(
                prefix,
                "end_date",
                "<=",
                Value::Text(format_date(d)),
            ));
        }
        if let Some(t) = &self.start_time {
            predicates.push(Predicate::compare(
                prefix,
                "start_time",
                ">=",
                Value::Text(format_time(t)),
            ));
        }
        if let Some(t) = &self.end_time {
            predicates.push(Predicate::compare(
                prefix,
                "end_time",
                "<=",
                Value::Text(format_time(t)),
            ));
        }

        let days = self
            .weekdays
            .iter()
            .map(|&d| Predicate::weekday(prefix, d))
            .collect();
        if let Some(days) = Predicate::any(days) {
            predicates.push(days);
        }

        SqlFilter { predicates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_paths_render_with_and_without_prefix() {
        assert_eq!(column(None, "start_date"), "start_date");
        assert_eq!(column(None, "workstation__track"), "workstation.track");
        assert_eq!(column(Some("session"), "start_date"), "session.start_date");
        assert_eq!(
            column(Some("session"), "workstation__track"),
            "session__workstation.track"
        );
        assert_eq!(workstation_alias(Some("session")), "session__workstation");
    }

    #[test]
    fn weekday_numbering_starts_on_sunday() {
        assert_eq!(internal_weekday(Weekday::Mon), 2);
        assert_eq!(internal_weekday(Weekday::Sat), 7);
        assert_eq!(internal_weekday(Weekday::Sun), 1);
    }

    #[test]
    fn empty_filter_only_requires_tracking() {
        let f = SessionFilter::default().build(None);
        assert_eq!(f.where_clause(), "workstation.track = ?");
        assert_eq!(f.params().collect::<Vec<_>>(), vec![&Value::Integer(1)]);
    }

    #[test]
    fn weekdays_are_or_joined_then_and_joined() {
        let filter = SessionFilter {
            location_id: Some(3),
            weekdays: vec![Weekday::Mon, Weekday::Sun],
            ..Default::default()
        };

        let f = filter.build(Some("session"));
        assert_eq!(
            f.where_clause(),
            "session__workstation.track = ? AND session__workstation.location_id = ? AND \
             (CAST(strftime('%w', session.start_ts) AS INTEGER) + 1 = ? OR \
             CAST(strftime('%w', session.start_ts) AS INTEGER) + 1 = ?)"
        );

        let params: Vec<&Value> = f.params().collect();
        assert_eq!(
            params,
            vec![
                &Value::Integer(1),
                &Value::Integer(3),
                &Value::Integer(2),
                &Value::Integer(1)
            ]
        );
    }

    #[test]
    fn date_and_time_bounds_use_storage_formats() {
        let filter = SessionFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 4),
            end_time: NaiveTime::from_hms_opt(17, 30, 0),
            ..Default::default()
        };

        let f = filter.build(None);
        assert_eq!(f.predicates().len(), 3);
        assert_eq!(f.predicates()[1].sql(), "start_date >= ?");
        assert_eq!(f.predicates()[1].params(), &[Value::Text("2024-03-04".into())]);
        assert_eq!(f.predicates()[2].sql(), "end_time <= ?");
        assert_eq!(f.predicates()[2].params(), &[Value::Text("17:30:00".into())]);
    }
}
