//! In-memory store implementation
//!
//! Backs the service binary and the test suites. Every write takes the
//! write lock for the duration of the mutation, so report replacement is
//! atomic per document as the store contract requires.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AggregatorError;
use crate::models::{NamespaceRegistration, ReportDocument, Sample};
use crate::store::MetricsStore;
use crate::window::AggregationWindow;

/// Key for persisted report documents
type ReportKey = (String, String, AggregationWindow);

#[derive(Default)]
struct Inner {
    samples: HashMap<(String, String), Vec<Sample>>,
    registrations: HashMap<String, NamespaceRegistration>,
    reports: HashMap<ReportKey, ReportDocument>,
}

/// In-memory metrics store
///
/// Cheap to clone; clones share the same underlying state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of report documents currently persisted
    pub async fn report_count(&self) -> usize {
        self.inner.read().await.reports.len()
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn samples(
        &self,
        account: &str,
        namespace: &str,
    ) -> Result<Vec<Sample>, AggregatorError> {
        let inner = self.inner.read().await;
        Ok(inner
            .samples
            .get(&(account.to_string(), namespace.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn registration(
        &self,
        account: &str,
    ) -> Result<Option<NamespaceRegistration>, AggregatorError> {
        let inner = self.inner.read().await;
        Ok(inner.registrations.get(account).cloned())
    }

    async fn replace_report(&self, document: ReportDocument) -> Result<(), AggregatorError> {
        let key = (
            document.account.clone(),
            document.namespace.clone(),
            document.window_type,
        );
        let mut inner = self.inner.write().await;
        inner.reports.insert(key, document);
        Ok(())
    }

    async fn report(
        &self,
        account: &str,
        namespace: &str,
        window: AggregationWindow,
    ) -> Result<Option<ReportDocument>, AggregatorError> {
        let inner = self.inner.read().await;
        Ok(inner
            .reports
            .get(&(account.to_string(), namespace.to_string(), window))
            .cloned())
    }

    async fn insert_samples(&self, samples: Vec<Sample>) -> Result<(), AggregatorError> {
        let mut inner = self.inner.write().await;
        for sample in samples {
            inner
                .samples
                .entry((sample.account.clone(), sample.namespace.clone()))
                .or_default()
                .push(sample);
        }
        Ok(())
    }

    async fn register_namespaces(
        &self,
        registration: NamespaceRegistration,
    ) -> Result<(), AggregatorError> {
        let mut inner = self.inner.write().await;
        inner
            .registrations
            .insert(registration.account.clone(), registration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(account: &str, namespace: &str, container: &str) -> Sample {
        Sample {
            account: account.to_string(),
            namespace: namespace.to_string(),
            container: container.to_string(),
            timestamp: Utc::now(),
            cpu_usage: 0.5,
            memory_usage: 0.5,
        }
    }

    #[tokio::test]
    async fn test_samples_for_unknown_pair_are_empty() {
        let store = MemoryStore::new();
        let samples = store.samples("nobody", "nowhere").await.unwrap();
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn test_samples_are_partitioned_by_account_and_namespace() {
        let store = MemoryStore::new();
        store
            .insert_samples(vec![
                sample("a1", "ns1", "c1"),
                sample("a1", "ns2", "c2"),
                sample("a2", "ns1", "c3"),
            ])
            .await
            .unwrap();

        assert_eq!(store.samples("a1", "ns1").await.unwrap().len(), 1);
        assert_eq!(store.samples("a1", "ns2").await.unwrap().len(), 1);
        assert_eq!(store.samples("a2", "ns1").await.unwrap().len(), 1);
        assert!(store.samples("a2", "ns2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_report_is_last_write_wins() {
        let store = MemoryStore::new();
        let doc = |entries: usize| ReportDocument {
            account: "a1".to_string(),
            namespace: "ns1".to_string(),
            window_type: AggregationWindow::Hour,
            entries: std::iter::repeat_with(|| crate::models::ReportEntry {
                container: "c1".to_string(),
                window_start: Utc::now(),
                cpu: crate::models::MetricStats {
                    avg: 0.0,
                    min: 0.0,
                    max: 0.0,
                    p90: 0.0,
                    p95: 0.0,
                    p99: 0.0,
                },
                memory: crate::models::MetricStats {
                    avg: 0.0,
                    min: 0.0,
                    max: 0.0,
                    p90: 0.0,
                    p95: 0.0,
                    p99: 0.0,
                },
            })
            .take(entries)
            .collect(),
        };

        store.replace_report(doc(3)).await.unwrap();
        store.replace_report(doc(1)).await.unwrap();

        assert_eq!(store.report_count().await, 1);
        let current = store
            .report("a1", "ns1", AggregationWindow::Hour)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_reports_keyed_by_window_type() {
        let store = MemoryStore::new();
        for window in AggregationWindow::ALL {
            store
                .replace_report(ReportDocument {
                    account: "a1".to_string(),
                    namespace: "ns1".to_string(),
                    window_type: window,
                    entries: vec![],
                })
                .await
                .unwrap();
        }
        assert_eq!(store.report_count().await, 4);
    }

    #[tokio::test]
    async fn test_registration_lookup() {
        let store = MemoryStore::new();
        store
            .register_namespaces(NamespaceRegistration {
                account: "a1".to_string(),
                namespaces: vec!["ns1".to_string(), "ns2".to_string()],
            })
            .await
            .unwrap();

        let found = store.registration("a1").await.unwrap().unwrap();
        assert_eq!(found.namespaces, vec!["ns1", "ns2"]);
        assert!(store.registration("a2").await.unwrap().is_none());
    }
}
