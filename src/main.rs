use anyhow::{Context, Result};
use azinv::azure::auth::AzureCredentials;
use azinv::azure::client::AzureClient;
use azinv::collect;
use azinv::config::RunConfig;
use azinv::report::xlsx::XlsxReportWriter;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Export an Azure App Service inventory to an Excel workbook
#[derive(Parser, Debug)]
#[command(name = "azinv", version, about, long_about = None)]
struct Args {
    /// Output workbook path (default: AppServiceInventory_<date>.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Subscription id(s) to scope every inventory query to (repeatable)
    #[arg(short, long = "subscription")]
    subscriptions: Vec<String>,

    /// Tenant id for token acquisition
    #[arg(long)]
    tenant: Option<String>,

    /// Log Analytics workspace id; enables the metrics sheets
    #[arg(short, long)]
    workspace: Option<String>,

    /// Log level for progress and diagnostics
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("azinv={tracing_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let config = RunConfig::new(args.output, args.subscriptions, args.tenant, args.workspace);

    if config.subscriptions.is_empty() {
        tracing::info!("No subscription filter; querying tenant-wide");
    }

    // Credential setup is the only fatal failure point; everything after it
    // degrades per query.
    let credentials = AzureCredentials::new(config.tenant.clone())
        .await
        .context("Failed to establish an Azure session")?;
    let client = AzureClient::new(credentials)?;

    let mut writer = XlsxReportWriter::new();
    let summary = collect::run(&client, &config, &mut writer).await?;

    if summary.written == 0 {
        tracing::warn!("No data collected; workbook not written");
        return Ok(());
    }

    writer.save(&config.output)?;
    tracing::info!(
        "Report written to {} ({} sheets, {} skipped)",
        config.output.display(),
        summary.written,
        summary.skipped
    );

    Ok(())
}
