//! Usage aggregator service
//!
//! HTTP surface and configuration for the aggregation service. The
//! binary in `main.rs` wires these together; exposing them as a library
//! lets the integration tests exercise the real router.

pub mod api;
pub mod config;
