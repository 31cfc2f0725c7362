//! Periods, week counts and the divisor resolver.
//!
//! RULE: Base periods are always averaged by their week count.
//! Only the campaign dimension may be summed.

use crate::error::{LiftError, LiftResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A labelled, inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub label:      String,
    pub start_date: NaiveDate,
    pub end_date:   NaiveDate,
}

impl Period {
    /// Build a period, rejecting inverted bounds.
    pub fn new(label: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> LiftResult<Self> {
        let period = Self { label: label.into(), start_date, end_date };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> LiftResult<()> {
        if self.start_date > self.end_date {
            return Err(LiftError::InvalidPeriod {
                label: self.label.clone(),
                start: self.start_date,
                end:   self.end_date,
            });
        }
        Ok(())
    }

    /// Number of calendar days covered, both ends included.
    pub fn day_span(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// `max(1, round(day_span / 7))`.
    /// day_span is integral, so day_span / 7 never lands exactly on .5.
    pub fn week_count(&self) -> u32 {
        let weeks = (self.day_span() + 3).div_euclid(7);
        weeks.max(1) as u32
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// Which side of a comparison a period sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodRole {
    Base,
    Campaign,
}

/// How raw sums over a period are normalised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisorPolicy {
    /// Divide by the period's week count.
    #[default]
    Average,
    /// Keep the raw total.
    Sum,
}

/// Number a raw sum over `period` is divided by.
/// Base periods ignore `policy` and are always averaged.
pub fn resolve_divisor(period: &Period, role: PeriodRole, policy: DivisorPolicy) -> u32 {
    let divisor = match (role, policy) {
        (PeriodRole::Base, _)                        => period.week_count(),
        (PeriodRole::Campaign, DivisorPolicy::Average) => period.week_count(),
        (PeriodRole::Campaign, DivisorPolicy::Sum)     => 1,
    };
    log::debug!(
        "divisor for '{}' ({role:?}, {policy:?}): {} days -> {divisor}",
        period.label,
        period.day_span()
    );
    divisor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new("p", day(start), day(end)).unwrap()
    }

    #[test]
    fn single_day_counts_as_one_week() {
        assert_eq!(period("2024-03-01", "2024-03-01").week_count(), 1);
    }

    #[test]
    fn week_count_rounds_to_nearest() {
        // 10 days = 1.43 weeks, 11 days = 1.57 weeks
        assert_eq!(period("2024-03-01", "2024-03-10").week_count(), 1);
        assert_eq!(period("2024-03-01", "2024-03-11").week_count(), 2);
        assert_eq!(period("2024-03-01", "2024-03-14").week_count(), 2);
        assert_eq!(period("2024-03-01", "2024-03-31").week_count(), 4);
    }

    #[test]
    fn week_count_matches_formula_for_many_spans() {
        let start = day("2024-01-01");
        for span in 1..=400i64 {
            let end = start + chrono::Duration::days(span - 1);
            let p = Period::new("p", start, end).unwrap();
            let expected = ((span as f64) / 7.0).round().max(1.0) as u32;
            assert_eq!(p.week_count(), expected, "span {span}");
        }
    }

    #[test]
    fn inverted_period_is_rejected() {
        let err = Period::new("bad", day("2024-03-10"), day("2024-03-01")).unwrap_err();
        assert!(matches!(err, LiftError::InvalidPeriod { .. }));
    }

    #[test]
    fn base_role_ignores_policy() {
        let p = period("2024-03-01", "2024-03-21");
        assert_eq!(resolve_divisor(&p, PeriodRole::Base, DivisorPolicy::Average), 3);
        assert_eq!(resolve_divisor(&p, PeriodRole::Base, DivisorPolicy::Sum), 3);
    }

    #[test]
    fn campaign_role_follows_policy() {
        let p = period("2024-03-01", "2024-03-21");
        assert_eq!(resolve_divisor(&p, PeriodRole::Campaign, DivisorPolicy::Average), 3);
        assert_eq!(resolve_divisor(&p, PeriodRole::Campaign, DivisorPolicy::Sum), 1);
    }
}
