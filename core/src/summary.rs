//! Report-level statistics across target rows.

use crate::{
    report::ReportRow,
    types::{Metric, RowKind},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub base_label:     String,
    pub campaign_label: String,
    /// Mean numeric change over target rows; sentinels are skipped.
    pub mean_change_total_visits:    Option<f64>,
    pub mean_change_filtered_visits: Option<f64>,
    pub mean_change_revenue:         Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub target_regions:  usize,
    /// Distinct configured control regions folded into the control row,
    /// not the number of control rows (which is 0 or 1).
    pub control_regions: usize,
    pub comparisons:     Vec<ComparisonSummary>,
}

impl ReportSummary {
    pub fn from_rows(rows: &[ReportRow], control_regions: usize) -> Self {
        let targets: Vec<&ReportRow> =
            rows.iter().filter(|r| r.kind == RowKind::Target).collect();

        let comparisons: Vec<ComparisonSummary> = rows
            .first()
            .map(|row| {
                row.comparisons
                    .iter()
                    .enumerate()
                    .map(|(i, c)| ComparisonSummary {
                        base_label:                  c.base_label.clone(),
                        campaign_label:              c.campaign_label.clone(),
                        mean_change_total_visits:    mean_change(&targets, i, Metric::TotalVisits),
                        mean_change_filtered_visits: mean_change(&targets, i, Metric::FilteredVisits),
                        mean_change_revenue:         mean_change(&targets, i, Metric::Revenue),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            target_regions: targets.len(),
            control_regions,
            comparisons,
        }
    }
}

fn mean_change(rows: &[&ReportRow], comparison: usize, metric: Metric) -> Option<f64> {
    let changes: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.comparisons.get(comparison))
        .filter_map(|c| c.cells.get(metric).change.as_percent())
        .collect();
    if changes.is_empty() {
        None
    } else {
        Some(changes.iter().sum::<f64>() / changes.len() as f64)
    }
}
