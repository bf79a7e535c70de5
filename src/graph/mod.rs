//! Resource Graph aggregation layer
//!
//! Drives the paginated bulk queries against Azure Resource Graph and merges
//! their pages into one result set per query.
//!
//! # Architecture
//!
//! - [`queries`] - The fixed registry of inventory and metrics query text
//! - [`page`] - Shape-tagged result sets and the merge builder
//! - [`executor`] - One-page fetch plus the auto-paginating merge loop

pub mod executor;
pub mod page;
pub mod queries;

pub use executor::fetch_all;
pub use page::{Column, ResultSet, ResultSetBuilder};
pub use queries::{QueryDef, INVENTORY_QUERIES, METRICS_QUERIES, PAGE_SIZE};
