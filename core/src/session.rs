//! Caller-owned history of generated reports.
//!
//! RULE: The engine never reads or writes a ReportBook. Callers append
//! one immutable (config, report) section per build.

use crate::{config::AnalysisConfig, report::Report};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub section_id:   Uuid,
    pub generated_at: DateTime<Utc>,
    pub config:       AnalysisConfig,
    pub report:       Report,
}

/// Append-only list of report sections.
#[derive(Debug, Default, Serialize)]
pub struct ReportBook {
    sections: Vec<ReportSection>,
}

impl ReportBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished build and return its section id.
    pub fn append(&mut self, config: AnalysisConfig, report: Report) -> Uuid {
        let section_id = Uuid::new_v4();
        self.sections.push(ReportSection {
            section_id,
            generated_at: Utc::now(),
            config,
            report,
        });
        section_id
    }

    pub fn get(&self, section_id: &Uuid) -> Option<&ReportSection> {
        self.sections.iter().find(|s| &s.section_id == section_id)
    }

    pub fn latest(&self) -> Option<&ReportSection> {
        self.sections.last()
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
