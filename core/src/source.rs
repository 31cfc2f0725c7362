//! Metric backends: raw, undivided sums per (region set, period).
//!
//! RULE: A MetricSource only sums. Division by week counts and region
//! counts happens in the engine, after raw sums are complete.

use crate::{
    config::{CommerceSchema, EventSchema},
    error::LiftResult,
    period::Period,
    predicate::{Field, FieldResolver, Predicate},
    table::{Cell, Table},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Raw visit sums over one selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficSums {
    pub total:    f64,
    /// Visits whose source is whitelisted.
    pub filtered: f64,
}

/// Anything that can answer the two aggregate questions the engine asks.
/// Sums cover every row of every listed region inside the period.
pub trait MetricSource {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn traffic(&self, regions: &[String], period: &Period) -> LiftResult<TrafficSums>;

    fn revenue(&self, regions: &[String], period: &Period) -> LiftResult<f64>;
}

/// Resolved column positions for the events table.
#[derive(Debug, Clone, Copy)]
struct EventColumns {
    region: usize,
    date:   usize,
    source: usize,
    visits: usize,
}

/// Resolved column positions for the commerce table.
#[derive(Debug, Clone, Copy)]
struct CommerceColumns {
    region:  usize,
    date:    usize,
    revenue: usize,
}

/// A row of a table seen through resolved column positions.
struct BoundRow<'a> {
    table:  &'a Table,
    row:    usize,
    region: usize,
    date:   usize,
    source: Option<usize>,
}

impl FieldResolver for BoundRow<'_> {
    fn label(&self, field: Field) -> Option<Cow<'_, str>> {
        let column = match field {
            Field::Region => self.region,
            Field::Date   => self.date,
            Field::Source => self.source?,
        };
        self.table.cell(self.row, column).as_label()
    }

    fn date(&self) -> Option<NaiveDate> {
        self.table.cell(self.row, self.date).as_date()
    }
}

/// Evaluates predicates row by row over borrowed tables.
pub struct MemorySource<'a> {
    events:           &'a Table,
    commerce:         &'a Table,
    event_columns:    EventColumns,
    commerce_columns: CommerceColumns,
    source_filter:    Predicate,
}

impl<'a> MemorySource<'a> {
    /// Resolve every configured column up front; a missing one fails here.
    pub fn new(
        events: &'a Table,
        event_schema: &EventSchema,
        commerce: &'a Table,
        commerce_schema: &CommerceSchema,
        source_whitelist: &[String],
    ) -> LiftResult<Self> {
        let event_columns = EventColumns {
            region: events.column_index(&event_schema.region_column)?,
            date:   events.column_index(&event_schema.date_column)?,
            source: events.column_index(&event_schema.source_column)?,
            visits: events.column_index(&event_schema.visits_column)?,
        };
        let commerce_columns = CommerceColumns {
            region:  commerce.column_index(&commerce_schema.region_column)?,
            date:    commerce.column_index(&commerce_schema.date_column)?,
            revenue: commerce.column_index(&commerce_schema.revenue_column)?,
        };
        warn_on_bad_dates(events, event_columns.date);
        warn_on_bad_dates(commerce, commerce_columns.date);

        Ok(Self {
            events,
            commerce,
            event_columns,
            commerce_columns,
            source_filter: Predicate::source_in(source_whitelist),
        })
    }

    fn event_row(&self, row: usize) -> BoundRow<'a> {
        BoundRow {
            table:  self.events,
            row,
            region: self.event_columns.region,
            date:   self.event_columns.date,
            source: Some(self.event_columns.source),
        }
    }

    fn commerce_row(&self, row: usize) -> BoundRow<'a> {
        BoundRow {
            table:  self.commerce,
            row,
            region: self.commerce_columns.region,
            date:   self.commerce_columns.date,
            source: None,
        }
    }
}

impl MetricSource for MemorySource<'_> {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn traffic(&self, regions: &[String], period: &Period) -> LiftResult<TrafficSums> {
        let selection = Predicate::cell(regions, period);
        let mut sums = TrafficSums::default();
        for row in 0..self.events.len() {
            let view = self.event_row(row);
            if !selection.matches(&view) {
                continue;
            }
            let visits = self.events.cell(row, self.event_columns.visits).as_number();
            sums.total += visits;
            if self.source_filter.matches(&view) {
                sums.filtered += visits;
            }
        }
        log::debug!(
            "memory traffic {regions:?} '{}': total={} filtered={}",
            period.label, sums.total, sums.filtered
        );
        Ok(sums)
    }

    fn revenue(&self, regions: &[String], period: &Period) -> LiftResult<f64> {
        let selection = Predicate::cell(regions, period);
        let revenue: f64 = (0..self.commerce.len())
            .filter(|&row| selection.matches(&self.commerce_row(row)))
            .map(|row| self.commerce.cell(row, self.commerce_columns.revenue).as_number())
            .sum();
        log::debug!("memory revenue {regions:?} '{}': {revenue}", period.label);
        Ok(revenue)
    }
}

/// Rows whose date cell cannot be read fall outside every period.
fn warn_on_bad_dates(table: &Table, date_column: usize) {
    let bad = (0..table.len())
        .filter(|&row| {
            let cell = table.cell(row, date_column);
            !matches!(cell, Cell::Null) && cell.as_date().is_none()
        })
        .count();
    if bad > 0 {
        log::warn!("{} table: {bad} rows have unreadable dates and are skipped", table.name);
    }
}
