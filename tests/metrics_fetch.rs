//! Integration tests for the Log Analytics metrics fetcher using wiremock

use azinv::azure::auth::AzureCredentials;
use azinv::azure::client::AzureClient;
use azinv::graph::queries::METRICS_QUERIES;
use azinv::metrics::fetch_metrics;
use azinv::report::QueryOutcome;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> AzureClient {
    AzureClient::new(AzureCredentials::from_token("test-token"))
        .expect("client should build")
        .with_endpoints(&server.uri(), &server.uri())
}

fn logs_body(rows: Vec<Value>) -> Value {
    json!({
        "tables": [{
            "name": "PrimaryResult",
            "columns": [
                {"name": "Resource", "type": "string"},
                {"name": "totalCpuSeconds", "type": "real"}
            ],
            "rows": rows
        }]
    })
}

/// Without a workspace id the fetcher makes zero backend calls
#[tokio::test]
async fn unset_workspace_skips_without_calls() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    for query in METRICS_QUERIES {
        let outcome = fetch_metrics(&client, None, query).await;
        assert!(matches!(outcome, QueryOutcome::Skipped));
    }

    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

/// A non-empty result list comes back as present rows
#[tokio::test]
async fn populated_result_is_present() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws-1/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(logs_body(vec![json!(["app-1", 12.5]), json!(["app-2", 3.0])])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = fetch_metrics(&client, Some("ws-1"), &METRICS_QUERIES[1]).await;

    match outcome {
        QueryOutcome::Rows(set) => assert_eq!(set.count(), 2),
        other => panic!("expected rows, got {:?}", other),
    }
}

/// Zero rows and a missing result table are both "ran, empty"
#[tokio::test]
async fn empty_and_missing_results_are_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws-empty/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(logs_body(vec![])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws-missing/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tables": []})))
        .mount(&server)
        .await;

    let client = test_client(&server);

    let empty = fetch_metrics(&client, Some("ws-empty"), &METRICS_QUERIES[0]).await;
    assert!(matches!(empty, QueryOutcome::Empty));

    let missing = fetch_metrics(&client, Some("ws-missing"), &METRICS_QUERIES[0]).await;
    assert!(matches!(missing, QueryOutcome::Empty));
}

/// A permission error on one metrics query fails only that table; siblings
/// are evaluated independently
#[tokio::test]
async fn permission_error_fails_only_that_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws-1/query"))
        .and(body_partial_json(json!({"query": METRICS_QUERIES[0].kql})))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": "InsufficientAccessError", "message": "denied"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/ws-1/query"))
        .and(body_partial_json(json!({"query": METRICS_QUERIES[1].kql})))
        .respond_with(ResponseTemplate::new(200).set_body_json(logs_body(vec![json!(["app-1", 1.0])])))
        .mount(&server)
        .await;

    let client = test_client(&server);

    let denied = fetch_metrics(&client, Some("ws-1"), &METRICS_QUERIES[0]).await;
    match denied {
        QueryOutcome::Failed(reason) => assert!(reason.contains("Permission denied")),
        other => panic!("expected failure, got {:?}", other),
    }

    let sibling = fetch_metrics(&client, Some("ws-1"), &METRICS_QUERIES[1]).await;
    assert!(sibling.is_present());

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
