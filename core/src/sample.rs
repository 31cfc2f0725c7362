//! Deterministic sample dataset for demos and tests.
//!
//! RULE: All randomness comes from one seeded Pcg64Mcg stream.
//! Same seed, same spec, same tables.

use crate::{
    config::{AnalysisConfig, CommerceSchema, DisplayMode, EventSchema},
    error::LiftResult,
    period::{DivisorPolicy, Period},
    table::{Cell, Table},
};
use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub const EVENT_REGION_COLUMN: &str = "Region";
pub const COMMERCE_REGION_COLUMN: &str = "Shipping region";

#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub regions: Vec<String>,
    pub sources: Vec<String>,
    pub start:   NaiveDate,
    pub days:    u32,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            regions: ["North", "South", "East", "West", "Central"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sources: ["google", "bing", "direct", "newsletter"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days:  70,
        }
    }
}

pub struct SampleDataset {
    pub events:   Table,
    pub commerce: Table,
}

impl SampleDataset {
    /// One events row per (day, region, source) and one commerce row
    /// per (day, region). Each region gets its own volume scale.
    pub fn generate(seed: u64, spec: &SampleSpec) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let mut events = Table::new(
            "events",
            &["Date", EVENT_REGION_COLUMN, "Session source", "Sessions"],
        );
        let mut commerce = Table::new("commerce", &["Day", COMMERCE_REGION_COLUMN, "Net sales"]);

        let scales: Vec<f64> = spec.regions.iter().map(|_| rng.gen_range(0.5..4.0)).collect();

        for offset in 0..spec.days {
            let day = spec.start + Duration::days(i64::from(offset));
            for (region, scale) in spec.regions.iter().zip(&scales) {
                let mut day_sessions = 0.0;
                for source in &spec.sources {
                    let sessions = (rng.gen_range(20.0..120.0) * scale).round();
                    day_sessions += sessions;
                    events.push_row(vec![
                        Cell::Date(day),
                        Cell::text(region.as_str()),
                        Cell::text(source.as_str()),
                        Cell::Number(sessions),
                    ]);
                }
                let net_sales = (day_sessions * rng.gen_range(0.8..2.5) * 100.0).round() / 100.0;
                commerce.push_row(vec![
                    Cell::Date(day),
                    Cell::text(region.as_str()),
                    Cell::Number(net_sales),
                ]);
            }
        }

        log::debug!(
            "sample dataset seed={seed}: {} event rows, {} commerce rows",
            events.len(),
            commerce.len()
        );
        Self { events, commerce }
    }
}

/// A configuration over a generated dataset: two 2-week base periods,
/// then two 1-week campaign periods. The last region is the control.
pub fn demo_config(spec: &SampleSpec) -> LiftResult<AnalysisConfig> {
    let at = |offset: i64| spec.start + Duration::days(offset);
    let controls: Vec<String> = spec.regions.last().cloned().into_iter().collect();

    Ok(AnalysisConfig {
        events:           EventSchema::new(EVENT_REGION_COLUMN),
        commerce:         CommerceSchema::new(COMMERCE_REGION_COLUMN),
        source_whitelist: spec.sources.iter().take(1).cloned().collect(),
        base_periods:     vec![
            Period::new("Base weeks 1-2", at(0), at(13))?,
            Period::new("Base weeks 3-4", at(14), at(27))?,
        ],
        campaign_periods: vec![
            Period::new("Campaign week 1", at(28), at(34))?,
            Period::new("Campaign week 2", at(35), at(41))?,
        ],
        regions:          spec.regions.clone(),
        control_regions:  controls,
        campaign_policy:  DivisorPolicy::Average,
        display_mode:     DisplayMode::Separate,
    })
}
