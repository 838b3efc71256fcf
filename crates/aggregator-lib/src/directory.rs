//! Namespace directory lookup

use std::sync::Arc;

use crate::error::AggregatorError;
use crate::store::MetricsStore;

/// Resolves an account to its registered namespaces
///
/// Lookups are idempotent and side-effect free. An unknown account (or
/// one with an empty registration) resolves to an empty vec, never an
/// error; only a malformed account string is rejected.
pub struct NamespaceDirectory<S> {
    store: Arc<S>,
}

impl<S: MetricsStore> NamespaceDirectory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn get_namespaces(&self, account: &str) -> Result<Vec<String>, AggregatorError> {
        if account.trim().is_empty() {
            return Err(AggregatorError::InvalidArgument(
                "account must not be empty".to_string(),
            ));
        }

        let registration = self.store.registration(account).await?;
        Ok(registration.map(|r| r.namespaces).unwrap_or_default())
    }
}
