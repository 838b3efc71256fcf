//! Aggregation orchestrator
//!
//! Resolves an account's namespaces and recomputes their report views
//! concurrently, one task per namespace with a join barrier. Namespaces
//! never share mutable state and never write to the same report key, so
//! a failing namespace neither cancels nor rolls back its siblings.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::directory::NamespaceDirectory;
use crate::error::AggregatorError;
use crate::observability::AggregatorMetrics;
use crate::store::MetricsStore;
use crate::updater::ReportUpdater;
use crate::window::AggregationWindow;

/// One namespace that failed during a run
#[derive(Debug)]
pub struct NamespaceFailure {
    pub namespace: String,
    pub error: AggregatorError,
}

/// Outcome of one orchestrator run
///
/// Every namespace of the account was attempted; the outcome records
/// how each attempt ended.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Namespaces whose report document was recomputed and persisted
    pub updated: Vec<String>,
    /// Namespaces attempted successfully but holding no samples
    pub empty: Vec<String>,
    /// Namespaces whose attempt failed, with the error
    pub failures: Vec<NamespaceFailure>,
}

impl RunOutcome {
    /// Full success: every attempted namespace completed without error
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fans out report recomputation across an account's namespaces
pub struct AggregationOrchestrator<S> {
    directory: NamespaceDirectory<S>,
    updater: Arc<dyn ReportUpdater>,
    metrics: AggregatorMetrics,
}

impl<S: MetricsStore + 'static> AggregationOrchestrator<S> {
    pub fn new(store: Arc<S>, updater: Arc<dyn ReportUpdater>) -> Self {
        Self {
            directory: NamespaceDirectory::new(store),
            updater,
            metrics: AggregatorMetrics::new(),
        }
    }

    /// Recompute the report views of every namespace of `account`
    ///
    /// Returns once every spawned task has completed, success or
    /// failure. An account with no namespaces is an immediate success.
    /// Only a malformed account fails the run as a whole.
    pub async fn run(
        &self,
        account: &str,
        window: AggregationWindow,
    ) -> Result<RunOutcome, AggregatorError> {
        let started = Instant::now();
        let namespaces = self.directory.get_namespaces(account).await?;
        if namespaces.is_empty() {
            info!(account, window = %window, "No namespaces registered, nothing to do");
            return Ok(RunOutcome::default());
        }

        let mut tasks = JoinSet::new();
        for namespace in namespaces {
            let updater = Arc::clone(&self.updater);
            let account = account.to_string();
            tasks.spawn(async move {
                // The update runs in its own task so a panic comes back
                // as a join error here, keeping the namespace attached
                // to the failure instead of tearing down this task.
                let update = tokio::spawn({
                    let namespace = namespace.clone();
                    async move { updater.update(&account, &namespace, window).await }
                });
                let result = match update.await {
                    Ok(result) => result,
                    Err(join_error) => Err(AggregatorError::ComputationFailure(format!(
                        "namespace task panicked: {join_error}"
                    ))),
                };
                (namespace, result)
            });
        }

        let mut outcome = RunOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((namespace, Ok(Some(_)))) => outcome.updated.push(namespace),
                Ok((namespace, Ok(None))) => outcome.empty.push(namespace),
                Ok((namespace, Err(error))) => {
                    warn!(
                        account,
                        namespace = %namespace,
                        window = %window,
                        error = %error,
                        "Namespace report update failed"
                    );
                    outcome.failures.push(NamespaceFailure { namespace, error });
                }
                // The collector tasks above only await; a join error
                // here means one was cancelled from outside the run.
                Err(join_error) => {
                    warn!(account, error = %join_error, "Namespace task aborted");
                    outcome.failures.push(NamespaceFailure {
                        namespace: String::new(),
                        error: AggregatorError::ComputationFailure(join_error.to_string()),
                    });
                }
            }
        }

        self.metrics.observe_run_duration(started.elapsed().as_secs_f64());
        self.metrics.add_reports_updated(outcome.updated.len() as u64);
        self.metrics.add_namespace_failures(outcome.failures.len() as u64);

        info!(
            account,
            window = %window,
            updated = outcome.updated.len(),
            empty = outcome.empty.len(),
            failed = outcome.failures.len(),
            "Aggregation run completed"
        );

        Ok(outcome)
    }
}
