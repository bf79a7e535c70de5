//! Azure Client
//!
//! Main client for the two backends the inventory talks to, combining
//! authentication, HTTP, and endpoint construction. Endpoints default to the
//! public Azure clouds and are overridable so tests can point the client at
//! a mock server.

use super::auth::{AzureCredentials, LOGS_AUDIENCE, MANAGEMENT_AUDIENCE};
use super::http::AzureHttpClient;
use anyhow::Result;
use serde_json::Value;

/// API version for the Resource Graph `resources` endpoint
const RESOURCE_GRAPH_API_VERSION: &str = "2022-10-01";

const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
const DEFAULT_LOGS_ENDPOINT: &str = "https://api.loganalytics.io";

/// Main Azure client
#[derive(Clone)]
pub struct AzureClient {
    pub credentials: AzureCredentials,
    pub http: AzureHttpClient,
    management_endpoint: String,
    logs_endpoint: String,
}

impl AzureClient {
    /// Create a new Azure client against the public cloud endpoints
    pub fn new(credentials: AzureCredentials) -> Result<Self> {
        let http = AzureHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            logs_endpoint: DEFAULT_LOGS_ENDPOINT.to_string(),
        })
    }

    /// Override backend endpoints (sovereign clouds, tests)
    pub fn with_endpoints(mut self, management: &str, logs: &str) -> Self {
        self.management_endpoint = management.trim_end_matches('/').to_string();
        self.logs_endpoint = logs.trim_end_matches('/').to_string();
        self
    }

    /// Get a management-plane access token
    pub async fn management_token(&self) -> Result<String> {
        self.credentials.get_token(MANAGEMENT_AUDIENCE).await
    }

    /// Get a Log Analytics access token
    pub async fn logs_token(&self) -> Result<String> {
        self.credentials.get_token(LOGS_AUDIENCE).await
    }

    /// Build the Resource Graph bulk-query URL
    pub fn resource_graph_url(&self) -> String {
        format!(
            "{}/providers/Microsoft.ResourceGraph/resources?api-version={}",
            self.management_endpoint, RESOURCE_GRAPH_API_VERSION
        )
    }

    /// Build the Log Analytics query URL for a workspace
    pub fn logs_query_url(&self, workspace: &str) -> String {
        format!("{}/v1/workspaces/{}/query", self.logs_endpoint, workspace)
    }

    /// POST to the Resource Graph endpoint
    pub async fn post_graph(&self, body: &Value) -> Result<Value> {
        let token = self.management_token().await?;
        self.http.post(&self.resource_graph_url(), &token, body).await
    }

    /// POST a query to a Log Analytics workspace
    pub async fn post_logs(&self, workspace: &str, body: &Value) -> Result<Value> {
        let token = self.logs_token().await?;
        self.http
            .post(&self.logs_query_url(workspace), &token, body)
            .await
    }
}
