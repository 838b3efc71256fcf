//! Core library for the usage metrics aggregator
//!
//! This crate provides the core functionality for:
//! - Windowed statistical rollups of per-container usage samples
//! - Folding rollups into per-namespace report documents
//! - Concurrent per-namespace report recomputation with failure isolation
//! - Store abstraction with an in-memory implementation
//! - Prometheus metrics

pub mod directory;
pub mod error;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod report;
pub mod rollup;
pub mod store;
pub mod updater;
pub mod window;

pub use directory::NamespaceDirectory;
pub use error::AggregatorError;
pub use models::*;
pub use observability::AggregatorMetrics;
pub use orchestrator::{AggregationOrchestrator, NamespaceFailure, RunOutcome};
pub use report::fold;
pub use rollup::rollup;
pub use store::{MemoryStore, MetricsStore};
pub use updater::{ReportUpdater, StoreReportUpdater};
pub use window::AggregationWindow;
