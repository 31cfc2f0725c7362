//! Multi-period combiner for campaign values.
//!
//! Per-period values arrive already normalised. Combined/Average is the
//! plain mean of those per-period rates; periods are not weighted by
//! their week counts.

use crate::{config::DisplayMode, period::DivisorPolicy, regions::MetricValues};

/// One campaign column of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignColumn {
    pub label:  String,
    pub values: MetricValues,
}

/// Fold per-period values into one: sum under `Sum`, mean under `Average`.
pub fn combine(values: &[MetricValues], policy: DivisorPolicy) -> MetricValues {
    let mut total = MetricValues::default();
    for v in values {
        total.total_visits += v.total_visits;
        total.filtered_visits += v.filtered_visits;
        total.revenue += v.revenue;
    }
    match policy {
        DivisorPolicy::Sum => total,
        DivisorPolicy::Average if values.is_empty() => total,
        DivisorPolicy::Average => total.divided_by(values.len() as f64),
    }
}

/// Label of the folded column, e.g. "Week 1 + Week 2".
pub fn combined_label(labels: &[&str]) -> String {
    labels.join(" + ")
}

/// Campaign columns to compare each base period against.
/// A single campaign period is passed through in either mode.
pub fn campaign_columns(
    per_period: Vec<CampaignColumn>,
    mode: DisplayMode,
    policy: DivisorPolicy,
) -> Vec<CampaignColumn> {
    if per_period.len() <= 1 || mode == DisplayMode::Separate {
        return per_period;
    }
    let labels: Vec<&str> = per_period.iter().map(|c| c.label.as_str()).collect();
    let values: Vec<MetricValues> = per_period.iter().map(|c| c.values).collect();
    vec![CampaignColumn {
        label:  combined_label(&labels),
        values: combine(&values, policy),
    }]
}
