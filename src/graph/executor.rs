//! Query execution and the pagination loop
//!
//! [`fetch_page`] issues one (query, pagination window) request against the
//! Resource Graph and parses the shape-tagged payload. [`fetch_all`] drives
//! repeated calls until exhaustion, merging pages through the builder.
//!
//! Failure policy: a failed or dataless response terminates that query's
//! pagination with a warning (the no-data signal); it is never fatal to the
//! run. Only token acquisition errors propagate, since they mean the whole
//! session is unusable.

use super::page::{Column, ResultSet, ResultSetBuilder};
use super::queries::{QueryDef, PAGE_SIZE};
use crate::azure::client::AzureClient;
use crate::azure::http::format_azure_error;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct TablePayload {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

/// Parse one response body into a shape-tagged page.
///
/// `data` as a `{columns, rows}` object is a table page; `data` as a bare
/// array is a list-like page; anything else is the no-data signal.
fn parse_page(body: &Value) -> Option<ResultSet> {
    let data = body.get("data")?;

    if data.get("columns").is_some() && data.get("rows").is_some() {
        let table: TablePayload = serde_json::from_value(data.clone()).ok()?;
        return Some(ResultSet::Table {
            columns: table.columns,
            rows: table.rows,
        });
    }

    data.as_array()
        .map(|records| ResultSet::Records(records.clone()))
}

/// Fetch one page of one query at the given skip offset.
///
/// Returns `Ok(None)` for the no-data signal: a failed request, a missing
/// page object, or a null data payload. The condition is surfaced as a
/// warning, not swallowed.
pub async fn fetch_page(
    client: &AzureClient,
    query: &QueryDef,
    skip: usize,
    subscriptions: &[String],
) -> Result<Option<ResultSet>> {
    let mut body = json!({
        "query": query.kql,
        "options": {
            "$top": PAGE_SIZE,
            "$skip": skip,
        }
    });
    if !subscriptions.is_empty() {
        body["subscriptions"] = json!(subscriptions);
    }

    // Token failures are setup failures and abort the run; request failures
    // only end this query's pagination.
    let token = client.management_token().await?;

    let response = match client
        .http
        .post(&client.resource_graph_url(), &token, &body)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                "{}: request at skip {} failed: {}",
                query.sheet,
                skip,
                format_azure_error(&e)
            );
            return Ok(None);
        }
    };

    match parse_page(&response) {
        Some(page) => Ok(Some(page)),
        None => {
            tracing::warn!("{}: backend returned no data payload at skip {}", query.sheet, skip);
            Ok(None)
        }
    }
}

/// Run one query's pagination loop to exhaustion and merge the pages.
///
/// Returns `None` when the backend never produced a page, `Some` otherwise -
/// including a merged set with zero rows, which is an ordinary terminator.
pub async fn fetch_all(
    client: &AzureClient,
    query: &QueryDef,
    subscriptions: &[String],
) -> Result<Option<ResultSet>> {
    tracing::info!("Querying {}...", query.sheet);

    let mut builder = ResultSetBuilder::new();
    let mut skip = 0usize;

    loop {
        let Some(page) = fetch_page(client, query, skip, subscriptions).await? else {
            break;
        };

        let fetched = page.count();
        if skip == 0 {
            builder.seed(page);
        } else {
            builder.append(page);
        }

        // A short page means the backend is exhausted
        if fetched < PAGE_SIZE {
            break;
        }
        skip += PAGE_SIZE;
    }

    let merged = builder.finalize();
    match &merged {
        Some(set) => tracing::info!("{}: {} rows", query.sheet, set.count()),
        None => tracing::warn!("{}: no data returned", query.sheet),
    }

    Ok(merged)
}
