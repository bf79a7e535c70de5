//! Azure API interaction module
//!
//! This module provides the core functionality for talking to the two Azure
//! backends the inventory uses: the Resource Graph (resource metadata) and
//! the Log Analytics query API (performance metrics).
//!
//! # Module Structure
//!
//! - [`auth`] - Bearer token acquisition and caching, per audience
//! - [`client`] - Main Azure client bundling credentials, HTTP and endpoints
//! - [`http`] - HTTP utilities for REST API calls

pub mod auth;
pub mod client;
pub mod http;
