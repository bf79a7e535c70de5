//! HTTP utilities for Azure REST API calls

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary; localized error bodies contain
        // multi-byte UTF-8 and a raw byte slice would panic mid-character
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Azure API calls
#[derive(Clone)]
pub struct AzureHttpClient {
    client: Client,
}

impl AzureHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("azinv/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a POST request with a JSON body to an Azure API
    pub async fn post(&self, url: &str, token: &str, body: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }
}

impl Default for AzureHttpClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default HTTP client")
    }
}

/// Format an Azure API error for display
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_azure_error(error: &anyhow::Error) -> String {
    let error_str = error.to_string();

    if error_str.contains("403") {
        return "Permission denied. Check your Azure RBAC role assignments.".to_string();
    }
    if error_str.contains("401") {
        return "Authentication failed. Run 'az login' or refresh AZURE_ACCESS_TOKEN.".to_string();
    }
    if error_str.contains("404") {
        return "Resource not found.".to_string();
    }
    if error_str.contains("429") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("400") {
        return "Invalid request. Check your query and parameters.".to_string();
    }
    if error_str.contains("500") || error_str.contains("503") {
        return "Azure service temporarily unavailable. Please try again.".to_string();
    }

    if error_str.contains("API request failed") {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    // Truncate long error messages and remove potential sensitive data
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
