//! Log Analytics metrics fetcher
//!
//! Metrics collection is opt-in: without a workspace id every metrics table
//! is skipped with zero backend calls. A configured query runs exactly once
//! (no pagination); backend errors are caught and reported with a
//! remediation hint, and must never abort the inventory run.

use crate::azure::client::AzureClient;
use crate::azure::http::format_azure_error;
use crate::graph::page::{Column, ResultSet};
use crate::graph::queries::QueryDef;
use crate::report::QueryOutcome;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct LogsResponse {
    #[serde(default)]
    tables: Vec<LogsTable>,
}

#[derive(Deserialize)]
struct LogsTable {
    #[allow(dead_code)]
    #[serde(default)]
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

/// Execute one metrics query. Returns an outcome, never an error: every
/// failure is absorbed here so sibling metrics queries run independently.
pub async fn fetch_metrics(
    client: &AzureClient,
    workspace: Option<&str>,
    query: &QueryDef,
) -> QueryOutcome {
    let Some(workspace) = workspace else {
        return QueryOutcome::Skipped;
    };

    tracing::info!("Querying {} (Log Analytics)...", query.sheet);

    match query_workspace(client, workspace, query).await {
        Ok(Some(set)) if !set.is_empty() => {
            tracing::info!("{}: {} rows", query.sheet, set.count());
            QueryOutcome::Rows(set)
        }
        Ok(_) => {
            tracing::info!("{}: no rows", query.sheet);
            QueryOutcome::Empty
        }
        Err(e) => {
            let reason = format_azure_error(&e);
            tracing::warn!("{}: metrics query failed: {} {}", query.sheet, reason, remediation(&e));
            QueryOutcome::Failed(reason)
        }
    }
}

async fn query_workspace(
    client: &AzureClient,
    workspace: &str,
    query: &QueryDef,
) -> Result<Option<ResultSet>> {
    let body = json!({ "query": query.kql });
    let response = client.post_logs(workspace, &body).await?;

    let parsed: LogsResponse =
        serde_json::from_value(response).context("Unexpected Log Analytics response shape")?;

    Ok(parsed.tables.into_iter().next().map(|table| ResultSet::Table {
        columns: table.columns,
        rows: table.rows,
    }))
}

fn remediation(error: &anyhow::Error) -> &'static str {
    let text = error.to_string();
    if text.contains("403") {
        "Grant the Log Analytics Reader role on the workspace to collect metrics."
    } else if text.contains("404") {
        "Check the workspace id passed with --workspace."
    } else {
        "The inventory continues without this metrics table."
    }
}
