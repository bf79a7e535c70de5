//! Run Configuration
//!
//! Resolved once at startup from CLI arguments with environment fallbacks,
//! then read-only for the rest of the run.

use chrono::Local;
use std::path::PathBuf;

/// Configuration for one inventory run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Workbook output path
    pub output: PathBuf,
    /// Subscription scope applied to every inventory query; empty means
    /// tenant-wide
    pub subscriptions: Vec<String>,
    /// Tenant for token acquisition only; not used by the query core
    pub tenant: Option<String>,
    /// Log Analytics workspace id; presence gates metrics collection
    pub workspace: Option<String>,
}

impl RunConfig {
    /// Resolve effective values (CLI > environment > default)
    pub fn new(
        output: Option<PathBuf>,
        subscriptions: Vec<String>,
        tenant: Option<String>,
        workspace: Option<String>,
    ) -> Self {
        let subscriptions = if subscriptions.is_empty() {
            std::env::var("AZURE_SUBSCRIPTION_ID")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| vec![s])
                .unwrap_or_default()
        } else {
            subscriptions
        };

        Self {
            output: output.unwrap_or_else(default_output_name),
            subscriptions,
            tenant: tenant.or_else(|| env_nonempty("AZURE_TENANT_ID")),
            workspace: workspace.or_else(|| env_nonempty("LOG_ANALYTICS_WORKSPACE_ID")),
        }
    }

    pub fn metrics_enabled(&self) -> bool {
        self.workspace.is_some()
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Dated default: `AppServiceInventory_YYYY-MM-DD.xlsx` in the working dir
fn default_output_name() -> PathBuf {
    PathBuf::from(format!(
        "AppServiceInventory_{}.xlsx",
        Local::now().format("%Y-%m-%d")
    ))
}
