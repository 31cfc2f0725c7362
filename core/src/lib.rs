//! Period comparison aggregation engine.
//!
//! Compares per-region traffic and revenue between base periods and
//! campaign periods, with target regions reported individually and
//! control regions folded into one synthetic row.

pub mod change;
pub mod combiner;
pub mod config;
pub mod engine;
pub mod error;
pub mod period;
pub mod predicate;
pub mod regions;
pub mod report;
pub mod sample;
pub mod session;
pub mod source;
pub mod store;
pub mod summary;
pub mod table;
pub mod types;

pub use config::AnalysisConfig;
pub use engine::{build_report, build_report_with, Backend, ComparisonEngine};
pub use error::{LiftError, LiftResult};
pub use report::Report;
