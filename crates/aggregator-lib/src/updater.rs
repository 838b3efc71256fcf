//! Report updater
//!
//! Runs the rollup pipeline and the report fold against the store for a
//! single namespace and persists the result. Alternative back-ends (for
//! example one pushing the whole pipeline down into the store engine)
//! implement the same trait and are drop-in substitutes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AggregatorError;
use crate::models::ReportDocument;
use crate::report::fold;
use crate::rollup::rollup;
use crate::store::MetricsStore;
use crate::window::AggregationWindow;

/// Contract for report recomputation back-ends
#[async_trait]
pub trait ReportUpdater: Send + Sync {
    /// Recompute and persist the report view for one namespace
    ///
    /// Every call is a full recomputation replacing any prior document
    /// for (account, namespace, window); there is no merge and no
    /// internal retry. Returns the persisted document, or `None` when
    /// the namespace has no samples.
    async fn update(
        &self,
        account: &str,
        namespace: &str,
        window: AggregationWindow,
    ) -> Result<Option<ReportDocument>, AggregatorError>;
}

/// Store-backed updater running the in-process pipeline
pub struct StoreReportUpdater<S> {
    store: Arc<S>,
}

impl<S: MetricsStore> StoreReportUpdater<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: MetricsStore> ReportUpdater for StoreReportUpdater<S> {
    async fn update(
        &self,
        account: &str,
        namespace: &str,
        window: AggregationWindow,
    ) -> Result<Option<ReportDocument>, AggregatorError> {
        if account.trim().is_empty() || namespace.trim().is_empty() {
            return Err(AggregatorError::InvalidArgument(
                "account and namespace must not be empty".to_string(),
            ));
        }

        let samples = self.store.samples(account, namespace).await?;
        debug!(
            account,
            namespace,
            window = %window,
            sample_count = samples.len(),
            "Computing report view"
        );

        let summaries = rollup(samples, window)?;
        let documents = fold(summaries, window);

        // The fold can only produce documents for pairs present in the
        // samples; for a single-namespace query that is at most one.
        let document = documents
            .into_iter()
            .find(|d| d.account == account && d.namespace == namespace);

        match document {
            Some(document) => {
                self.store.replace_report(document.clone()).await?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn sample(namespace: &str, container: &str, minute: u32, cpu: f64, memory: f64) -> Sample {
        Sample {
            account: "account1".to_string(),
            namespace: namespace.to_string(),
            container: container.to_string(),
            timestamp: Utc.with_ymd_and_hms(2021, 1, 1, 0, minute, 0).unwrap(),
            cpu_usage: cpu,
            memory_usage: memory,
        }
    }

    #[tokio::test]
    async fn test_update_persists_and_returns_the_document() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_samples(vec![
                sample("namespace1", "container1", 0, 0.1, 0.2),
                sample("namespace1", "container2", 1, 0.3, 0.4),
            ])
            .await
            .unwrap();

        let updater = StoreReportUpdater::new(store.clone());
        let document = updater
            .update("account1", "namespace1", AggregationWindow::Hour)
            .await
            .unwrap()
            .expect("document for a namespace with samples");

        assert_eq!(document.entries.len(), 2);

        let persisted = store
            .report("account1", "namespace1", AggregationWindow::Hour)
            .await
            .unwrap()
            .expect("persisted report");
        assert_eq!(persisted.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_update_without_samples_yields_none_and_no_write() {
        let store = Arc::new(MemoryStore::new());
        let updater = StoreReportUpdater::new(store.clone());

        let document = updater
            .update("account1", "namespace1", AggregationWindow::Day)
            .await
            .unwrap();

        assert!(document.is_none());
        assert_eq!(store.report_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_the_prior_document() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_samples(vec![sample("namespace1", "container1", 0, 0.1, 0.2)])
            .await
            .unwrap();

        let updater = StoreReportUpdater::new(store.clone());
        updater
            .update("account1", "namespace1", AggregationWindow::Hour)
            .await
            .unwrap();

        // New samples arrive; the next run is a full recomputation.
        store
            .insert_samples(vec![sample("namespace1", "container2", 30, 0.9, 0.9)])
            .await
            .unwrap();
        let document = updater
            .update("account1", "namespace1", AggregationWindow::Hour)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(document.entries.len(), 2);
        assert_eq!(store.report_count().await, 1);
    }

    #[tokio::test]
    async fn test_blank_identifiers_are_rejected() {
        let updater = StoreReportUpdater::new(Arc::new(MemoryStore::new()));
        let err = updater
            .update("", "namespace1", AggregationWindow::Hour)
            .await
            .unwrap_err();
        assert!(matches!(err, AggregatorError::InvalidArgument(_)));
    }
}
