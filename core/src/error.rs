use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Period '{label}' is inverted: start {start} is after end {end}")]
    InvalidPeriod {
        label: String,
        start: NaiveDate,
        end:   NaiveDate,
    },

    #[error("Column '{column}' not found in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type LiftResult<T> = Result<T, LiftError>;
