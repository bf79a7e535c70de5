//! Collection orchestrator
//!
//! Runs the six inventory queries through the pagination loop, then the four
//! metrics queries through the Log Analytics fetcher, strictly in order and
//! strictly sequentially. Owns the ordered collection of named tables for
//! the run and hands it to the report writer exactly once.

use crate::azure::client::AzureClient;
use crate::config::RunConfig;
use crate::graph::queries::{INVENTORY_QUERIES, METRICS_QUERIES};
use crate::graph::{executor, page::ResultSet};
use crate::metrics;
use crate::report::{self, NamedTable, QueryOutcome, ReportWriter};
use anyhow::Result;

/// What the run produced, for the exit summary
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Execute every configured query and classify each result.
///
/// Absent and empty tables are retained in the collection so their position
/// and label are known for skip narration downstream.
pub async fn collect_tables(client: &AzureClient, config: &RunConfig) -> Result<Vec<NamedTable>> {
    let mut tables = Vec::with_capacity(INVENTORY_QUERIES.len() + METRICS_QUERIES.len());

    for query in INVENTORY_QUERIES {
        let merged: Option<ResultSet> =
            executor::fetch_all(client, query, &config.subscriptions).await?;
        tables.push(NamedTable::new(query.sheet, QueryOutcome::from_merge(merged)));
    }

    if !config.metrics_enabled() {
        tracing::info!("No Log Analytics workspace configured; skipping metrics collection");
    }
    for query in METRICS_QUERIES {
        let outcome = metrics::fetch_metrics(client, config.workspace.as_deref(), query).await;
        tables.push(NamedTable::new(query.sheet, outcome));
    }

    Ok(tables)
}

/// Collect everything and hand the finished collection to the writer once
pub async fn run(
    client: &AzureClient,
    config: &RunConfig,
    writer: &mut dyn ReportWriter,
) -> Result<RunSummary> {
    let tables = collect_tables(client, config).await?;
    let total = tables.len();
    let written = report::write_report(tables, writer)?;

    Ok(RunSummary {
        written,
        skipped: total - written,
    })
}
