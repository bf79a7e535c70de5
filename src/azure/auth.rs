//! Azure Authentication
//!
//! Acquires bearer tokens either from the `AZURE_ACCESS_TOKEN` environment
//! variable (CI, scripted runs) or from the Azure CLI's cached session via
//! `az account get-access-token`. Tokens are requested per audience: the
//! management plane and the Log Analytics query API use different resources.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Audience for Azure Resource Manager / Resource Graph calls
pub const MANAGEMENT_AUDIENCE: &str = "https://management.azure.com/";

/// Audience for Log Analytics query API calls
pub const LOGS_AUDIENCE: &str = "https://api.loganalytics.io/";

/// Token expiry buffer - refresh tokens this much before they actually expire
/// This prevents using tokens that are about to expire during a request
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Azure credentials holder with per-audience token caching
#[derive(Clone)]
pub struct AzureCredentials {
    source: TokenSource,
    token_cache: Arc<RwLock<HashMap<String, CachedToken>>>,
}

#[derive(Clone)]
enum TokenSource {
    /// A fixed token used for every audience (env var or tests)
    Static(String),
    /// Shell out to the Azure CLI per audience
    Cli { tenant: Option<String> },
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl AzureCredentials {
    /// Create new Azure credentials.
    ///
    /// Prefers `AZURE_ACCESS_TOKEN` when set; otherwise verifies the Azure
    /// CLI is available so a missing session fails the run up front rather
    /// than mid-collection.
    pub async fn new(tenant: Option<String>) -> Result<Self> {
        if let Ok(token) = std::env::var("AZURE_ACCESS_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(Self::from_token(token.trim()));
            }
        }

        let probe = tokio::process::Command::new("az")
            .args(["version", "--output", "none"])
            .output()
            .await
            .context(
                "Azure CLI not found. Install az and run 'az login', or set AZURE_ACCESS_TOKEN",
            )?;

        if !probe.status.success() {
            anyhow::bail!("Azure CLI is present but not functional. Run 'az login' and retry");
        }

        Ok(Self {
            source: TokenSource::Cli { tenant },
            token_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Create credentials from a fixed token (used by tests and CI pipelines)
    pub fn from_token(token: &str) -> Self {
        Self {
            source: TokenSource::Static(token.to_string()),
            token_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get an access token for the given audience
    pub async fn get_token(&self, audience: &str) -> Result<String> {
        if let TokenSource::Static(token) = &self.source {
            return Ok(token.clone());
        }

        // Check cache first - but only return if token is still valid
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.get(audience) {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token for {} expired, fetching new token", audience);
            }
        }

        let token_str = self.fetch_cli_token(audience).await?;

        // The CLI reports an expiresOn timestamp but its format varies by
        // version and locale; a conservative fixed TTL is reliable enough.
        let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

        {
            let mut cache = self.token_cache.write().await;
            cache.insert(
                audience.to_string(),
                CachedToken {
                    token: token_str.clone(),
                    expires_at,
                },
            );
        }

        tracing::debug!(
            "New token cached for {}, expires in ~{} minutes",
            audience,
            (DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token_str)
    }

    async fn fetch_cli_token(&self, audience: &str) -> Result<String> {
        let TokenSource::Cli { tenant } = &self.source else {
            unreachable!("fetch_cli_token is only reached for CLI credentials");
        };

        let mut cmd = tokio::process::Command::new("az");
        cmd.args(["account", "get-access-token", "--resource", audience])
            .args(["--output", "json"]);
        if let Some(tenant) = tenant {
            cmd.args(["--tenant", tenant]);
        }

        let output = cmd
            .output()
            .await
            .context("Failed to invoke 'az account get-access-token'")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "az account get-access-token failed: {}",
                stderr.lines().next().unwrap_or("unknown error")
            );
        }

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)
            .context("Failed to parse az CLI token output")?;

        parsed
            .get("accessToken")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .context("az CLI token output did not contain an accessToken")
    }
}
