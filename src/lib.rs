//! azinv - Azure App Service inventory exporter
//!
//! Inventories an App Service estate through six paginated Azure Resource
//! Graph queries, optionally enriches it with four Log Analytics metrics
//! queries, and writes one Excel workbook with one sheet per non-empty
//! result set.

pub mod azure;
pub mod collect;
pub mod config;
pub mod graph;
pub mod metrics;
pub mod report;
