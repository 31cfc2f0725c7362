//! SQLite aggregation backend.
//!
//! RULE: Only store.rs talks to the database.
//! Every label reaches SQL as a bound parameter; statement text is built
//! from fixed column names and placeholders only.

use crate::{
    config::{CommerceSchema, EventSchema},
    error::LiftResult,
    period::Period,
    predicate::Predicate,
    source::{MetricSource, TrafficSums},
    table::{Cell, Table},
};
use rusqlite::{params, params_from_iter, types::Value, Connection};

pub struct SqliteSource {
    conn:          Connection,
    source_filter: Predicate,
}

impl SqliteSource {
    /// Copy the mapped columns of both tables into a fresh in-memory
    /// database. A missing column fails before anything is inserted.
    pub fn load(
        events: &Table,
        event_schema: &EventSchema,
        commerce: &Table,
        commerce_schema: &CommerceSchema,
        source_whitelist: &[String],
    ) -> LiftResult<Self> {
        let ev_region = events.column_index(&event_schema.region_column)?;
        let ev_date = events.column_index(&event_schema.date_column)?;
        let ev_source = events.column_index(&event_schema.source_column)?;
        let ev_visits = events.column_index(&event_schema.visits_column)?;
        let co_region = commerce.column_index(&commerce_schema.region_column)?;
        let co_date = commerce.column_index(&commerce_schema.date_column)?;
        let co_revenue = commerce.column_index(&commerce_schema.revenue_column)?;

        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("../migrations/001_snapshot.sql"))?;

        let tx = conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO traffic (region, day, source, visits) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in 0..events.len() {
                insert.execute(params![
                    label_value(events.cell(row, ev_region)),
                    day_value(events.cell(row, ev_date)),
                    label_value(events.cell(row, ev_source)),
                    events.cell(row, ev_visits).as_number(),
                ])?;
            }

            let mut insert = tx.prepare(
                "INSERT INTO orders (region, day, revenue) VALUES (?1, ?2, ?3)",
            )?;
            for row in 0..commerce.len() {
                insert.execute(params![
                    label_value(commerce.cell(row, co_region)),
                    day_value(commerce.cell(row, co_date)),
                    commerce.cell(row, co_revenue).as_number(),
                ])?;
            }
        }
        tx.commit()?;
        log::debug!(
            "sqlite snapshot loaded: {} traffic rows, {} order rows",
            events.len(),
            commerce.len()
        );

        Ok(Self {
            conn,
            source_filter: Predicate::source_in(source_whitelist),
        })
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Rows copied into the traffic table (for tests).
    pub fn traffic_row_count(&self) -> LiftResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM traffic", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Rows copied into the orders table (for tests).
    pub fn order_row_count(&self) -> LiftResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl MetricSource for SqliteSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn traffic(&self, regions: &[String], period: &Period) -> LiftResult<TrafficSums> {
        let mut bound: Vec<Value> = Vec::new();
        let source_sql = self.source_filter.to_sql(&mut bound);
        let selection_sql = Predicate::cell(regions, period).to_sql(&mut bound);
        let sql = format!(
            "SELECT COALESCE(SUM(visits), 0.0),
                    COALESCE(SUM(CASE WHEN {source_sql} THEN visits ELSE 0.0 END), 0.0)
             FROM traffic WHERE {selection_sql}"
        );
        let sums = self.conn.query_row(&sql, params_from_iter(bound.iter()), |row| {
            Ok(TrafficSums {
                total:    row.get(0)?,
                filtered: row.get(1)?,
            })
        })?;
        log::debug!(
            "sqlite traffic {regions:?} '{}': total={} filtered={}",
            period.label, sums.total, sums.filtered
        );
        Ok(sums)
    }

    fn revenue(&self, regions: &[String], period: &Period) -> LiftResult<f64> {
        let mut bound: Vec<Value> = Vec::new();
        let selection_sql = Predicate::cell(regions, period).to_sql(&mut bound);
        let sql = format!("SELECT COALESCE(SUM(revenue), 0.0) FROM orders WHERE {selection_sql}");
        let revenue: f64 =
            self.conn
                .query_row(&sql, params_from_iter(bound.iter()), |row| row.get(0))?;
        log::debug!("sqlite revenue {regions:?} '{}': {revenue}", period.label);
        Ok(revenue)
    }
}

fn label_value(cell: &Cell) -> Value {
    match cell.as_label() {
        Some(label) => Value::Text(label.into_owned()),
        None        => Value::Null,
    }
}

/// ISO text so that range comparisons in SQL order like dates.
fn day_value(cell: &Cell) -> Value {
    match cell.as_date() {
        Some(day) => Value::Text(day.format("%Y-%m-%d").to_string()),
        None      => Value::Null,
    }
}
