//! Typed row filters.
//!
//! RULE: Filters are data, not query text. A Predicate is either
//! evaluated against a row in-process or translated mechanically into
//! SQL where every label travels as a bound parameter.

use crate::period::Period;
use chrono::NaiveDate;
use rusqlite::types::Value;
use std::borrow::Cow;

/// Logical fields a predicate can test. Each backend maps these onto
/// its own physical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Region,
    Date,
    Source,
}

impl Field {
    /// Canonical column name in the SQL backend's tables.
    pub fn sql_column(self) -> &'static str {
        match self {
            Field::Region => "region",
            Field::Date   => "day",
            Field::Source => "source",
        }
    }
}

/// Read access to one row through the logical fields.
pub trait FieldResolver {
    fn label(&self, field: Field) -> Option<Cow<'_, str>>;
    fn date(&self) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact string equality.
    Equals { field: Field, value: String },
    /// Set membership. An empty set matches nothing.
    InSet { field: Field, values: Vec<String> },
    /// Inclusive on both ends.
    DateRange { start: NaiveDate, end: NaiveDate },
    And(Vec<Predicate>),
    Never,
}

impl Predicate {
    /// Rows of any of `regions`: equality for one, membership for many.
    pub fn regions(regions: &[String]) -> Self {
        match regions {
            [single] => Predicate::Equals { field: Field::Region, value: single.clone() },
            many     => Predicate::InSet { field: Field::Region, values: many.to_vec() },
        }
    }

    pub fn within(period: &Period) -> Self {
        Predicate::DateRange { start: period.start_date, end: period.end_date }
    }

    /// Rows whose source is whitelisted. Empty whitelist matches nothing.
    pub fn source_in(whitelist: &[String]) -> Self {
        if whitelist.is_empty() {
            Predicate::Never
        } else {
            Predicate::InSet { field: Field::Source, values: whitelist.to_vec() }
        }
    }

    /// The selection for one cell: region(s) AND period.
    pub fn cell(regions: &[String], period: &Period) -> Self {
        Predicate::And(vec![Predicate::regions(regions), Predicate::within(period)])
    }

    pub fn matches(&self, row: &dyn FieldResolver) -> bool {
        match self {
            Predicate::Equals { field, value } => {
                row.label(*field).is_some_and(|l| l == value.as_str())
            }
            Predicate::InSet { field, values } => row
                .label(*field)
                .is_some_and(|l| values.iter().any(|v| v.as_str() == l)),
            Predicate::DateRange { start, end } => row
                .date()
                .is_some_and(|d| *start <= d && d <= *end),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(row)),
            Predicate::Never => false,
        }
    }

    /// Render as a SQL boolean expression, pushing bound values onto
    /// `params` in placeholder order.
    pub fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::Equals { field, value } => {
                params.push(Value::Text(value.clone()));
                format!("{} = ?", field.sql_column())
            }
            Predicate::InSet { values, .. } if values.is_empty() => "0".to_string(),
            Predicate::InSet { field, values } => {
                params.extend(values.iter().map(|v| Value::Text(v.clone())));
                let slots = vec!["?"; values.len()].join(", ");
                format!("{} IN ({slots})", field.sql_column())
            }
            Predicate::DateRange { start, end } => {
                params.push(Value::Text(start.format("%Y-%m-%d").to_string()));
                params.push(Value::Text(end.format("%Y-%m-%d").to_string()));
                let col = Field::Date.sql_column();
                format!("({col} >= ? AND {col} <= ?)")
            }
            Predicate::And(parts) if parts.is_empty() => "1".to_string(),
            Predicate::And(parts) => {
                let clauses: Vec<String> = parts.iter().map(|p| p.to_sql(params)).collect();
                format!("({})", clauses.join(" AND "))
            }
            Predicate::Never => "0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        region: &'static str,
        source: Option<&'static str>,
        day:    NaiveDate,
    }

    impl FieldResolver for Row {
        fn label(&self, field: Field) -> Option<Cow<'_, str>> {
            match field {
                Field::Region => Some(Cow::Borrowed(self.region)),
                Field::Source => self.source.map(Cow::Borrowed),
                Field::Date   => None,
            }
        }

        fn date(&self) -> Option<NaiveDate> {
            Some(self.day)
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn period(start: u32, end: u32) -> Period {
        Period::new("p", day(start), day(end)).unwrap()
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let p = Predicate::within(&period(3, 9));
        for (d, expected) in [(2, false), (3, true), (6, true), (9, true), (10, false)] {
            let row = Row { region: "East", source: None, day: day(d) };
            assert_eq!(p.matches(&row), expected, "day {d}");
        }
    }

    #[test]
    fn region_match_is_exact() {
        let p = Predicate::regions(&["East".to_string()]);
        assert!(p.matches(&Row { region: "East", source: None, day: day(1) }));
        assert!(!p.matches(&Row { region: "east", source: None, day: day(1) }));
        assert!(!p.matches(&Row { region: "East ", source: None, day: day(1) }));
    }

    #[test]
    fn empty_whitelist_matches_nothing() {
        let p = Predicate::source_in(&[]);
        assert_eq!(p, Predicate::Never);
        assert!(!p.matches(&Row { region: "East", source: Some("google"), day: day(1) }));
    }

    #[test]
    fn missing_source_never_matches_whitelist() {
        let p = Predicate::source_in(&["google".to_string()]);
        assert!(!p.matches(&Row { region: "East", source: None, day: day(1) }));
        assert!(p.matches(&Row { region: "East", source: Some("google"), day: day(1) }));
    }

    #[test]
    fn quoted_labels_stay_in_parameters() {
        let hostile = "O'Brien' OR '1'='1".to_string();
        let p = Predicate::cell(&[hostile.clone()], &period(1, 7));
        let mut params = Vec::new();
        let sql = p.to_sql(&mut params);

        assert!(!sql.contains("O'Brien"), "label leaked into SQL: {sql}");
        assert_eq!(sql, "(region = ? AND (day >= ? AND day <= ?))");
        assert_eq!(params[0], Value::Text(hostile));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn empty_sets_render_as_constant_false() {
        let mut params = Vec::new();
        assert_eq!(Predicate::source_in(&[]).to_sql(&mut params), "0");
        let empty = Predicate::InSet { field: Field::Source, values: Vec::new() };
        assert_eq!(empty.to_sql(&mut params), "0");
        assert!(params.is_empty());
    }

    #[test]
    fn multi_region_uses_membership() {
        let regions = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut params = Vec::new();
        let sql = Predicate::regions(&regions).to_sql(&mut params);
        assert_eq!(sql, "region IN (?, ?, ?)");
        assert_eq!(params.len(), 3);
    }
}
