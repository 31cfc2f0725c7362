//! Region resolver: target regions and the folded control set.
//!
//! RULE: The control set sums raw values across all control regions
//! first and divides exactly once, by (control region count × divisor).
//! Averaging per-region rates is a different number and is not used.

use crate::{
    error::LiftResult,
    period::Period,
    source::MetricSource,
    types::{Metric, Region},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The three metric values for one region (or control set) and period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    pub total_visits:    f64,
    pub filtered_visits: f64,
    pub revenue:         f64,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalVisits    => self.total_visits,
            Metric::FilteredVisits => self.filtered_visits,
            Metric::Revenue        => self.revenue,
        }
    }

    pub fn divided_by(&self, divisor: f64) -> Self {
        Self {
            total_visits:    self.total_visits / divisor,
            filtered_visits: self.filtered_visits / divisor,
            revenue:         self.revenue / divisor,
        }
    }
}

/// Configured regions split into individually reported targets and
/// the control regions folded into one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPartition {
    pub targets:  Vec<Region>,
    pub controls: Vec<Region>,
}

/// `targets = configured − controls`, keeping configured order.
/// Duplicates are dropped from both lists.
pub fn partition(configured: &[Region], controls: &[Region]) -> RegionPartition {
    let mut seen_controls = HashSet::new();
    let controls: Vec<Region> = controls
        .iter()
        .filter(|r| seen_controls.insert(r.as_str()))
        .cloned()
        .collect();

    let mut seen_targets = HashSet::new();
    let targets = configured
        .iter()
        .filter(|r| !seen_controls.contains(r.as_str()))
        .filter(|r| seen_targets.insert(r.as_str()))
        .cloned()
        .collect();

    RegionPartition { targets, controls }
}

/// Undivided sums of all three metrics over `regions` in `period`.
pub fn raw_values(
    source: &dyn MetricSource,
    regions: &[Region],
    period: &Period,
) -> LiftResult<MetricValues> {
    let traffic = source.traffic(regions, period)?;
    let revenue = source.revenue(regions, period)?;
    Ok(MetricValues {
        total_visits:    traffic.total,
        filtered_visits: traffic.filtered,
        revenue,
    })
}

/// Normalised values for a single target region.
pub fn target_values(
    source: &dyn MetricSource,
    region: &Region,
    period: &Period,
    divisor: u32,
) -> LiftResult<MetricValues> {
    let raw = raw_values(source, std::slice::from_ref(region), period)?;
    Ok(raw.divided_by(f64::from(divisor)))
}

/// Normalised values for the control set: one raw sum across every
/// control region, then a single division.
pub fn control_values(
    source: &dyn MetricSource,
    controls: &[Region],
    period: &Period,
    divisor: u32,
) -> LiftResult<MetricValues> {
    let raw = raw_values(source, controls, period)?;
    let denominator = controls.len() as f64 * f64::from(divisor);
    Ok(raw.divided_by(denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<Region> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partition_preserves_configured_order() {
        let p = partition(
            &names(&["North", "East", "South", "West"]),
            &names(&["South"]),
        );
        assert_eq!(p.targets, names(&["North", "East", "West"]));
        assert_eq!(p.controls, names(&["South"]));
    }

    #[test]
    fn controls_need_not_be_selected_targets() {
        let p = partition(&names(&["North"]), &names(&["South", "West"]));
        assert_eq!(p.targets, names(&["North"]));
        assert_eq!(p.controls, names(&["South", "West"]));
    }

    #[test]
    fn duplicates_are_dropped() {
        let p = partition(&names(&["A", "B", "A"]), &names(&["C", "C"]));
        assert_eq!(p.targets, names(&["A", "B"]));
        assert_eq!(p.controls, names(&["C"]));
    }
}
