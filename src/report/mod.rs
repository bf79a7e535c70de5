//! Report handoff contract
//!
//! The orchestrator produces one ordered collection of [`NamedTable`]s per
//! run and hands it to a [`ReportWriter`] exactly once. Each table carries a
//! [`QueryOutcome`] so "ran with zero rows", "backend produced no data",
//! "not configured" and "failed" stay distinguishable all the way to the
//! operator-facing skip narration.

pub mod xlsx;

use crate::graph::page::ResultSet;
use anyhow::Result;

/// Outcome of one query source
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// Ran to completion with at least one row
    Rows(ResultSet),
    /// Ran to completion with zero rows
    Empty,
    /// The backend never produced a page
    NoData,
    /// Not configured to run (metrics without a workspace)
    Skipped,
    /// Backend error, recovered; the reason shown to the operator
    Failed(String),
}

impl QueryOutcome {
    /// Classify a pagination result: no page at all is `NoData`, a merged
    /// set with zero rows is `Empty`.
    pub fn from_merge(merged: Option<ResultSet>) -> Self {
        match merged {
            None => QueryOutcome::NoData,
            Some(set) if set.is_empty() => QueryOutcome::Empty,
            Some(set) => QueryOutcome::Rows(set),
        }
    }

    /// Rows to be written, when present
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            QueryOutcome::Rows(set) => Some(set),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.rows().is_some()
    }
}

/// One labeled result set destined for one section of the report
#[derive(Debug, Clone)]
pub struct NamedTable {
    pub name: String,
    pub outcome: QueryOutcome,
}

impl NamedTable {
    pub fn new(name: &str, outcome: QueryOutcome) -> Self {
        Self {
            name: name.to_string(),
            outcome,
        }
    }
}

/// Sink for report sections. The xlsx writer is the production
/// implementation; tests substitute a recorder.
pub trait ReportWriter {
    /// Persist one labeled, non-empty section
    fn write_section(&mut self, name: &str, rows: &ResultSet) -> Result<()>;
}

/// Walk the ordered collection once: write every present table, narrate why
/// each absent one is skipped. Returns the number of sections written.
pub fn write_report(tables: Vec<NamedTable>, writer: &mut dyn ReportWriter) -> Result<usize> {
    let mut written = 0;

    for table in &tables {
        match &table.outcome {
            QueryOutcome::Rows(set) => {
                writer.write_section(&table.name, set)?;
                written += 1;
            }
            QueryOutcome::Empty => tracing::info!("Skipping {}: no rows", table.name),
            QueryOutcome::NoData => {
                tracing::warn!("Skipping {}: backend returned no data", table.name)
            }
            QueryOutcome::Skipped => {
                tracing::info!("Skipping {}: metrics collection not configured", table.name)
            }
            QueryOutcome::Failed(reason) => {
                tracing::warn!("Skipping {}: {}", table.name, reason)
            }
        }
    }

    Ok(written)
}
