//! Report rows: the engine's only output.
//!
//! Values are unformatted numbers. Currency symbols, thousands
//! separators and HTML belong to whoever renders the report.

use crate::{
    change::Change,
    period::{Period, PeriodRole},
    summary::ReportSummary,
    types::{Metric, Region, RowKind},
};
use chrono::NaiveDate;
use serde::Serialize;

/// One (row, metric, comparison) triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub base_value:     f64,
    pub campaign_value: f64,
    pub change:         Change,
}

impl ComparisonCell {
    pub fn new(base_value: f64, campaign_value: f64) -> Self {
        Self {
            base_value,
            campaign_value,
            change: Change::between(base_value, campaign_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCells {
    pub total_visits:    ComparisonCell,
    pub filtered_visits: ComparisonCell,
    pub revenue:         ComparisonCell,
}

impl MetricCells {
    pub fn get(&self, metric: Metric) -> &ComparisonCell {
        match metric {
            Metric::TotalVisits    => &self.total_visits,
            Metric::FilteredVisits => &self.filtered_visits,
            Metric::Revenue        => &self.revenue,
        }
    }
}

/// One base period compared against one campaign column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub base_label:     String,
    pub campaign_label: String,
    pub cells:          MetricCells,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub region:      Region,
    pub kind:        RowKind,
    /// Base-period major, campaign column minor.
    pub comparisons: Vec<Comparison>,
}

impl ReportRow {
    pub fn comparison(&self, base_label: &str, campaign_label: &str) -> Option<&Comparison> {
        self.comparisons
            .iter()
            .find(|c| c.base_label == base_label && c.campaign_label == campaign_label)
    }
}

/// How one configured period was normalised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub label:      String,
    pub role:       PeriodRole,
    pub start_date: NaiveDate,
    pub end_date:   NaiveDate,
    pub day_span:   i64,
    pub week_count: u32,
    pub divisor:    u32,
}

impl PeriodSummary {
    pub fn new(period: &Period, role: PeriodRole, divisor: u32) -> Self {
        Self {
            label:      period.label.clone(),
            role,
            start_date: period.start_date,
            end_date:   period.end_date,
            day_span:   period.day_span(),
            week_count: period.week_count(),
            divisor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Targets in selection order, then the control set if any.
    pub rows:    Vec<ReportRow>,
    pub periods: Vec<PeriodSummary>,
    pub summary: ReportSummary,
}

impl Report {
    pub fn row(&self, region: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.region == region)
    }

    pub fn control_row(&self) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.kind == RowKind::Control)
    }
}
