//! Analysis configuration and schema mappings.
//!
//! A config is fully resolved before the engine runs. `validate()` is the
//! single gate for configuration errors; nothing downstream re-checks.

use crate::{
    error::{LiftError, LiftResult},
    period::{DivisorPolicy, Period},
    types::Region,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column names for the behavioural-events table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchema {
    pub region_column: String,
    #[serde(default = "default_event_date_column")]
    pub date_column:   String,
    #[serde(default = "default_source_column")]
    pub source_column: String,
    #[serde(default = "default_visits_column")]
    pub visits_column: String,
}

impl EventSchema {
    pub fn new(region_column: impl Into<String>) -> Self {
        Self {
            region_column: region_column.into(),
            date_column:   default_event_date_column(),
            source_column: default_source_column(),
            visits_column: default_visits_column(),
        }
    }
}

/// Column names for the commerce-orders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommerceSchema {
    pub region_column:  String,
    #[serde(default = "default_commerce_date_column")]
    pub date_column:    String,
    #[serde(default = "default_revenue_column")]
    pub revenue_column: String,
}

impl CommerceSchema {
    pub fn new(region_column: impl Into<String>) -> Self {
        Self {
            region_column:  region_column.into(),
            date_column:    default_commerce_date_column(),
            revenue_column: default_revenue_column(),
        }
    }
}

/// How several campaign periods appear in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// One comparison per campaign period.
    #[default]
    Separate,
    /// All campaign periods folded into one value.
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub events:   EventSchema,
    pub commerce: CommerceSchema,
    #[serde(default)]
    pub source_whitelist: Vec<String>,
    pub base_periods:     Vec<Period>,
    pub campaign_periods: Vec<Period>,
    pub regions:          Vec<Region>,
    #[serde(default)]
    pub control_regions:  Vec<Region>,
    /// Normalisation for campaign periods; also the combine mode when
    /// several campaign periods are folded together.
    #[serde(default)]
    pub campaign_policy:  DivisorPolicy,
    #[serde(default)]
    pub display_mode:     DisplayMode,
}

pub const MAX_BASE_PERIODS: usize = 2;

impl AnalysisConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> LiftResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject every configuration error before any aggregation runs.
    pub fn validate(&self) -> LiftResult<()> {
        if self.regions.is_empty() {
            return Err(LiftError::Config("no regions selected".into()));
        }
        if self.base_periods.is_empty() || self.base_periods.len() > MAX_BASE_PERIODS {
            return Err(LiftError::Config(format!(
                "expected 1 to {MAX_BASE_PERIODS} base periods, got {}",
                self.base_periods.len()
            )));
        }
        if self.campaign_periods.is_empty() {
            return Err(LiftError::Config("at least one campaign period is required".into()));
        }
        for period in self.base_periods.iter().chain(&self.campaign_periods) {
            period.validate()?;
        }

        let columns = [
            ("events.region_column", &self.events.region_column),
            ("events.date_column", &self.events.date_column),
            ("events.source_column", &self.events.source_column),
            ("events.visits_column", &self.events.visits_column),
            ("commerce.region_column", &self.commerce.region_column),
            ("commerce.date_column", &self.commerce.date_column),
            ("commerce.revenue_column", &self.commerce.revenue_column),
        ];
        for (key, column) in columns {
            if column.trim().is_empty() {
                return Err(LiftError::Config(format!("{key} is empty")));
            }
        }
        Ok(())
    }
}

fn default_event_date_column() -> String {
    "Date".to_string()
}
fn default_source_column() -> String {
    "Session source".to_string()
}
fn default_visits_column() -> String {
    "Sessions".to_string()
}
fn default_commerce_date_column() -> String {
    "Day".to_string()
}
fn default_revenue_column() -> String {
    "Net sales".to_string()
}
