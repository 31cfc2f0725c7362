//! Already-cleaned tabular input.
//!
//! The engine never mutates a Table. Column names are resolved at
//! configuration time through a schema mapping, never hard-coded.

use crate::error::{LiftError, LiftResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const ISO_DATE: &str = "%Y-%m-%d";

/// One cell of a table. Deserialises from plain JSON scalars:
/// `null`, numbers, ISO date strings and any other string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Numeric value for summation. Nulls, unparseable text and
    /// non-finite values (NaN, infinities) count as 0.
    pub fn as_number(&self) -> f64 {
        let n = match self {
            Cell::Number(n)  => *n,
            Cell::Text(s)    => s.trim().parse().unwrap_or(0.0),
            Cell::Null | Cell::Date(_) => 0.0,
        };
        if n.is_finite() { n } else { 0.0 }
    }

    /// Calendar day, if the cell holds one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => NaiveDate::parse_from_str(s.trim(), ISO_DATE).ok(),
            _             => None,
        }
    }

    /// Exact label for equality and membership tests.
    /// Integral numbers render without a fractional part.
    pub fn as_label(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null      => None,
            Cell::Text(s)   => Some(Cow::Borrowed(s.as_str())),
            Cell::Date(d)   => Some(Cow::Owned(d.format(ISO_DATE).to_string())),
            Cell::Number(n) => Some(Cow::Owned(if n.fract() == 0.0 && n.is_finite() {
                format!("{n:.0}")
            } else {
                n.to_string()
            })),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

/// A named-column table of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name used in error messages ("events", "commerce").
    #[serde(default)]
    pub name:    String,
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name:    name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows:    Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a configured column name to its index.
    pub fn column_index(&self, column: &str) -> LiftResult<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| LiftError::MissingColumn {
                table:  self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell at (row, column), Null when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        static NULL: Cell = Cell::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }
}
