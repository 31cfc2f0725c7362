//! The comparison table builder.
//!
//! BUILD ORDER (fixed):
//!   1. Validate the configuration (no aggregation on a bad config).
//!   2. Partition regions into targets and the control set.
//!   3. Resolve one divisor per period.
//!   4. Sum and normalise every (row, period) cell.
//!   5. Combine campaign periods, then compare against each base period.
//!
//! RULES:
//!   - The engine is a pure function of (tables, config). No state is
//!     kept between builds.
//!   - Any failure aborts the whole build. There are no partial reports.

use crate::{
    combiner::{campaign_columns, CampaignColumn},
    config::AnalysisConfig,
    error::LiftResult,
    period::{resolve_divisor, DivisorPolicy, Period, PeriodRole},
    regions::{control_values, partition, target_values, MetricValues},
    report::{Comparison, ComparisonCell, MetricCells, PeriodSummary, Report, ReportRow},
    source::{MemorySource, MetricSource},
    store::SqliteSource,
    summary::ReportSummary,
    table::Table,
    types::{Region, RowKind, CONTROL_SET_LABEL},
};
use serde::{Deserialize, Serialize};

/// Where the aggregation queries run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Memory,
    Sqlite,
}

/// A period paired with its resolved divisor.
struct Normalised<'a> {
    period:  &'a Period,
    divisor: u32,
}

/// What a report row aggregates over.
enum RowSubject<'a> {
    Target(&'a Region),
    Control(&'a [Region]),
}

pub struct ComparisonEngine<'c> {
    config: &'c AnalysisConfig,
}

impl<'c> ComparisonEngine<'c> {
    /// Validate `config` and bind an engine to it.
    pub fn new(config: &'c AnalysisConfig) -> LiftResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn build(&self, source: &dyn MetricSource) -> LiftResult<Report> {
        let config = self.config;
        let regions = partition(&config.regions, &config.control_regions);

        let bases: Vec<Normalised> = config
            .base_periods
            .iter()
            .map(|period| Normalised {
                period,
                // Base periods are always averaged.
                divisor: resolve_divisor(period, PeriodRole::Base, DivisorPolicy::Average),
            })
            .collect();
        let campaigns: Vec<Normalised> = config
            .campaign_periods
            .iter()
            .map(|period| Normalised {
                period,
                divisor: resolve_divisor(period, PeriodRole::Campaign, config.campaign_policy),
            })
            .collect();

        let mut subjects: Vec<RowSubject> =
            regions.targets.iter().map(RowSubject::Target).collect();
        if !regions.controls.is_empty() {
            subjects.push(RowSubject::Control(&regions.controls));
        }

        log::info!(
            "building report on {} backend: {} target regions, {} control regions, {} base x {} campaign periods ({:?}, {:?})",
            source.name(),
            regions.targets.len(),
            regions.controls.len(),
            bases.len(),
            campaigns.len(),
            config.campaign_policy,
            config.display_mode,
        );

        let rows = subjects
            .iter()
            .map(|subject| self.build_row(source, subject, &bases, &campaigns))
            .collect::<LiftResult<Vec<_>>>()?;

        let periods = bases
            .iter()
            .map(|n| PeriodSummary::new(n.period, PeriodRole::Base, n.divisor))
            .chain(
                campaigns
                    .iter()
                    .map(|n| PeriodSummary::new(n.period, PeriodRole::Campaign, n.divisor)),
            )
            .collect();
        let summary = ReportSummary::from_rows(&rows, regions.controls.len());

        Ok(Report { rows, periods, summary })
    }

    fn build_row(
        &self,
        source: &dyn MetricSource,
        subject: &RowSubject,
        bases: &[Normalised],
        campaigns: &[Normalised],
    ) -> LiftResult<ReportRow> {
        let values_for = |n: &Normalised| -> LiftResult<MetricValues> {
            match subject {
                RowSubject::Target(region)    => target_values(source, region, n.period, n.divisor),
                RowSubject::Control(controls) => control_values(source, controls, n.period, n.divisor),
            }
        };

        let per_period = campaigns
            .iter()
            .map(|n| {
                Ok(CampaignColumn {
                    label:  n.period.label.clone(),
                    values: values_for(n)?,
                })
            })
            .collect::<LiftResult<Vec<_>>>()?;
        let columns = campaign_columns(
            per_period,
            self.config.display_mode,
            self.config.campaign_policy,
        );

        let mut comparisons = Vec::with_capacity(bases.len() * columns.len());
        for base in bases {
            let base_values = values_for(base)?;
            for column in &columns {
                comparisons.push(Comparison {
                    base_label:     base.period.label.clone(),
                    campaign_label: column.label.clone(),
                    cells:          compare(&base_values, &column.values),
                });
            }
        }

        let (region, kind) = match subject {
            RowSubject::Target(region) => ((*region).clone(), RowKind::Target),
            RowSubject::Control(_)     => (CONTROL_SET_LABEL.to_string(), RowKind::Control),
        };
        Ok(ReportRow { region, kind, comparisons })
    }
}

fn compare(base: &MetricValues, campaign: &MetricValues) -> MetricCells {
    MetricCells {
        total_visits:    ComparisonCell::new(base.total_visits, campaign.total_visits),
        filtered_visits: ComparisonCell::new(base.filtered_visits, campaign.filtered_visits),
        revenue:         ComparisonCell::new(base.revenue, campaign.revenue),
    }
}

/// Build a report over in-memory tables.
pub fn build_report(events: &Table, commerce: &Table, config: &AnalysisConfig) -> LiftResult<Report> {
    build_report_with(events, commerce, config, Backend::Memory)
}

/// Build a report, running the aggregation on the chosen backend.
/// Configuration is checked before any table is touched.
pub fn build_report_with(
    events: &Table,
    commerce: &Table,
    config: &AnalysisConfig,
    backend: Backend,
) -> LiftResult<Report> {
    let engine = ComparisonEngine::new(config)?;
    match backend {
        Backend::Memory => {
            let source = MemorySource::new(
                events,
                &config.events,
                commerce,
                &config.commerce,
                &config.source_whitelist,
            )?;
            engine.build(&source)
        }
        Backend::Sqlite => {
            let source = SqliteSource::load(
                events,
                &config.events,
                commerce,
                &config.commerce,
                &config.source_whitelist,
            )?;
            engine.build(&source)
        }
    }
}
