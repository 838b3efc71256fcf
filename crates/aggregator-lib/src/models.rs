//! Core data models for the usage metrics aggregator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::AggregationWindow;

/// One raw usage observation for a container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub account: String,
    pub namespace: String,
    pub container: String,
    pub timestamp: DateTime<Utc>,
    pub cpu_usage: f64,
    pub memory_usage: f64,
}

/// Summary statistics for one metric over one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Per-container rollup for one window
///
/// `window_start` is always an exact truncation boundary for the window
/// the rollup was computed with. Computed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSummary {
    pub account: String,
    pub namespace: String,
    pub container: String,
    pub window_start: DateTime<Utc>,
    pub cpu: MetricStats,
    pub memory: MetricStats,
}

/// A window summary re-shaped for the report view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub container: String,
    pub window_start: DateTime<Utc>,
    pub cpu: MetricStats,
    pub memory: MetricStats,
}

impl From<WindowSummary> for ReportEntry {
    fn from(summary: WindowSummary) -> Self {
        Self {
            container: summary.container,
            window_start: summary.window_start,
            cpu: summary.cpu,
            memory: summary.memory,
        }
    }
}

/// The persisted report view for one (account, namespace, window type)
///
/// Entries preserve the fold's insertion order, which is chronological
/// because the rollup sorts samples before grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub account: String,
    pub namespace: String,
    pub window_type: AggregationWindow,
    pub entries: Vec<ReportEntry>,
}

/// Static mapping of an account to its namespaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceRegistration {
    pub account: String,
    pub namespaces: Vec<String>,
}
