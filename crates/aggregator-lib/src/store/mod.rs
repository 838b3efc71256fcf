//! Store abstraction for samples, registrations and report documents
//!
//! The core treats persistence as an abstract queryable store: a sample
//! query capability, a point lookup for namespace registrations, and an
//! atomic replace-or-insert write keyed by (account, namespace, window).
//! A production time-series engine is a drop-in trait implementation;
//! this crate ships an in-memory one for the service and for tests.

mod memory;

pub use memory::MemoryStore;

use crate::error::AggregatorError;
use crate::models::{NamespaceRegistration, ReportDocument, Sample};
use crate::window::AggregationWindow;

pub use async_trait::async_trait;

/// Trait for store implementations
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Fetch every retained sample for one (account, namespace)
    ///
    /// No time-range filter; retention is controlled externally. An
    /// unknown pair yields an empty vec.
    async fn samples(
        &self,
        account: &str,
        namespace: &str,
    ) -> Result<Vec<Sample>, AggregatorError>;

    /// Point lookup of the namespace registration for one account
    async fn registration(
        &self,
        account: &str,
    ) -> Result<Option<NamespaceRegistration>, AggregatorError>;

    /// Atomic replace-or-insert of a report document
    ///
    /// The key is (account, namespace, window_type); any prior document
    /// for that exact key is discarded.
    async fn replace_report(&self, document: ReportDocument) -> Result<(), AggregatorError>;

    /// Read back the current report document for a key, if any
    async fn report(
        &self,
        account: &str,
        namespace: &str,
        window: AggregationWindow,
    ) -> Result<Option<ReportDocument>, AggregatorError>;

    /// Append a batch of raw samples
    async fn insert_samples(&self, samples: Vec<Sample>) -> Result<(), AggregatorError>;

    /// Register (or replace) the namespace set for an account
    async fn register_namespaces(
        &self,
        registration: NamespaceRegistration,
    ) -> Result<(), AggregatorError>;
}
