//! Integration tests for the Resource Graph pagination loop using wiremock
//!
//! These tests verify the merge loop against mocked endpoints: loop
//! termination, shape handling, and the no-data signal.

use azinv::azure::auth::AzureCredentials;
use azinv::azure::client::AzureClient;
use azinv::graph::page::ResultSet;
use azinv::graph::queries::{INVENTORY_QUERIES, PAGE_SIZE};
use azinv::graph::{executor, fetch_all};
use serde_json::{json, Value};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPH_PATH: &str = "/providers/Microsoft.ResourceGraph/resources";

fn test_client(server: &MockServer) -> AzureClient {
    AzureClient::new(AzureCredentials::from_token("test-token"))
        .expect("client should build")
        .with_endpoints(&server.uri(), &server.uri())
}

/// A table-shaped page of `count` generated rows
fn table_page(start: usize, count: usize) -> Value {
    let rows: Vec<Value> = (0..count)
        .map(|i| json!([format!("app-{:04}", start + i)]))
        .collect();
    json!({
        "totalRecords": 2437,
        "count": count,
        "data": {
            "columns": [{"name": "name", "type": "string"}],
            "rows": rows
        }
    })
}

async fn mount_page(server: &MockServer, skip: usize, body: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(body_partial_json(json!({"options": {"$skip": skip}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Pages of 1000, 1000, 437 merge to 2437 rows and stop after three calls
#[tokio::test]
async fn full_pages_then_short_page_merge_and_stop() {
    let server = MockServer::start().await;
    mount_page(&server, 0, table_page(0, PAGE_SIZE)).await;
    mount_page(&server, PAGE_SIZE, table_page(PAGE_SIZE, PAGE_SIZE)).await;
    mount_page(&server, 2 * PAGE_SIZE, table_page(2 * PAGE_SIZE, 437)).await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[0], &[])
        .await
        .expect("token path should not fail")
        .expect("backend returned pages");

    assert_eq!(merged.count(), 2437);
    match &merged {
        ResultSet::Table { columns, rows } => {
            assert_eq!(columns.len(), 1);
            assert_eq!(rows[0][0], json!("app-0000"));
            assert_eq!(rows[2436][0], json!("app-2436"));
        }
        other => panic!("expected table, got {:?}", other),
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

/// An empty first page is an ordinary terminator: zero rows, one call
#[tokio::test]
async fn empty_first_page_stops_immediately() {
    let server = MockServer::start().await;
    mount_page(&server, 0, table_page(0, 0)).await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[1], &[])
        .await
        .unwrap()
        .expect("an empty page still yields a merged set");

    assert_eq!(merged.count(), 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

/// List-shaped pages come back as ordered records
#[tokio::test]
async fn list_shaped_page_preserves_order() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({
            "count": 3,
            "data": [{"name": "a"}, {"name": "b"}, {"name": "c"}]
        }),
    )
    .await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[5], &[])
        .await
        .unwrap()
        .unwrap();

    match merged {
        ResultSet::Records(records) => {
            assert_eq!(records.len(), 3);
            assert_eq!(records[0]["name"], "a");
            assert_eq!(records[2]["name"], "c");
        }
        other => panic!("expected records, got {:?}", other),
    }
}

/// Tabular pages with identical columns keep the column set and sum rows
#[tokio::test]
async fn tabular_merge_keeps_column_set() {
    let columns = json!([
        {"name": "name", "type": "string"},
        {"name": "location", "type": "string"}
    ]);
    let full_rows: Vec<Value> = (0..PAGE_SIZE)
        .map(|i| json!([format!("app-{}", i), "westeurope"]))
        .collect();

    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"count": PAGE_SIZE, "data": {"columns": columns.clone(), "rows": full_rows}}),
    )
    .await;
    mount_page(
        &server,
        PAGE_SIZE,
        json!({"count": 1, "data": {"columns": columns, "rows": [["tail", "eastus"]]}}),
    )
    .await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[0], &[])
        .await
        .unwrap()
        .unwrap();

    match merged {
        ResultSet::Table { columns, rows } => {
            assert_eq!(columns.len(), 2);
            assert_eq!(columns[0].name, "name");
            assert_eq!(columns[1].name, "location");
            assert_eq!(rows.len(), PAGE_SIZE + 1);
        }
        other => panic!("expected table, got {:?}", other),
    }
}

/// A null data payload is the no-data signal: no merged set at all
#[tokio::test]
async fn null_data_payload_yields_no_result() {
    let server = MockServer::start().await;
    mount_page(&server, 0, json!({"count": 0, "data": null})).await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[2], &[]).await.unwrap();

    assert!(merged.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

/// A failed request ends the query without failing the run
#[tokio::test]
async fn request_failure_degrades_to_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": "AuthorizationFailed", "message": "denied"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[0], &[]).await.unwrap();

    assert!(merged.is_none());
}

/// A localized (multi-byte) error body still degrades to no-data: the
/// truncated error logging must not split a character
#[tokio::test]
async fn non_ascii_error_body_degrades_to_no_data() {
    let server = MockServer::start().await;
    // 'é' straddles the 200-byte log truncation point
    let body = format!("{}échec de l'autorisation {}", "x".repeat(199), "é".repeat(100));
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[0], &[]).await.unwrap();

    assert!(merged.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

/// A mid-run no-data signal keeps what was merged so far
#[tokio::test]
async fn mid_run_no_data_returns_partial_merge() {
    let server = MockServer::start().await;
    mount_page(&server, 0, table_page(0, PAGE_SIZE)).await;
    mount_page(&server, PAGE_SIZE, json!({"count": 0, "data": null})).await;

    let client = test_client(&server);
    let merged = fetch_all(&client, &INVENTORY_QUERIES[0], &[])
        .await
        .unwrap()
        .expect("first page was merged before the signal");

    assert_eq!(merged.count(), PAGE_SIZE);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

/// The subscription scope and bearer token ride along on every page request
#[tokio::test]
async fn request_carries_scope_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(bearer_token("test-token"))
        .and(body_partial_json(json!({
            "subscriptions": ["sub-1", "sub-2"],
            "options": {"$top": PAGE_SIZE, "$skip": 0}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(table_page(0, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let subs = vec!["sub-1".to_string(), "sub-2".to_string()];
    let page = executor::fetch_page(&client, &INVENTORY_QUERIES[0], 0, &subs)
        .await
        .unwrap();

    assert_eq!(page.unwrap().count(), 2);
    server.verify().await;
}
