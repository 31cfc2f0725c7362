//! Shared primitive types used across the engine.

use serde::{Deserialize, Serialize};

/// A region label, taken verbatim from the configured region column.
pub type Region = String;

/// Label of the synthetic row that folds every control region together.
pub const CONTROL_SET_LABEL: &str = "Control set";

/// The three metrics reported for every region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalVisits,
    FilteredVisits,
    Revenue,
}

impl Metric {
    /// Report order: traffic first, then revenue.
    pub const ALL: [Metric; 3] = [Metric::TotalVisits, Metric::FilteredVisits, Metric::Revenue];

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalVisits    => "total_visits",
            Metric::FilteredVisits => "filtered_visits",
            Metric::Revenue        => "revenue",
        }
    }
}

/// Whether a report row stands for one region or the folded control set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Target,
    Control,
}
