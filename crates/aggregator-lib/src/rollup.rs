//! Statistical rollup pipeline
//!
//! Pure transformation from raw samples to per-container window summaries.
//! Samples are sorted by timestamp, grouped by
//! (account, namespace, container, truncated timestamp), and each group is
//! reduced to avg/min/max plus approximate p90/p95/p99 for cpu and memory.
//!
//! Percentiles use a sorted-sample nearest-rank estimate: deterministic,
//! seed-free, with rank error at most 1/(2n) for a group of n values. A
//! single-element group therefore reports every percentile as that element.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::AggregatorError;
use crate::models::{MetricStats, Sample, WindowSummary};
use crate::window::AggregationWindow;

type GroupKey = (String, String, String, DateTime<Utc>);

struct Group {
    cpu: Vec<f64>,
    memory: Vec<f64>,
}

/// Compute windowed per-container summaries from raw samples
///
/// Emission order is first-seen group order after the timestamp sort,
/// so summaries come out chronologically by window start. An empty
/// sample set yields an empty vec.
pub fn rollup(
    mut samples: Vec<Sample>,
    window: AggregationWindow,
) -> Result<Vec<WindowSummary>, AggregatorError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // Stable sort keeps same-timestamp samples in arrival order, which
    // makes the group emission order deterministic.
    samples.sort_by_key(|s| s.timestamp);

    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Group> = HashMap::new();

    for sample in samples {
        if !sample.cpu_usage.is_finite() || !sample.memory_usage.is_finite() {
            return Err(AggregatorError::ComputationFailure(format!(
                "non-finite usage value for container {} at {}",
                sample.container, sample.timestamp
            )));
        }

        let key = (
            sample.account,
            sample.namespace,
            sample.container,
            window.truncate(sample.timestamp),
        );
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group {
                cpu: Vec::new(),
                memory: Vec::new(),
            }
        });
        group.cpu.push(sample.cpu_usage);
        group.memory.push(sample.memory_usage);
    }

    let mut summaries = Vec::with_capacity(order.len());
    for key in order {
        let group = groups.remove(&key).ok_or_else(|| {
            AggregatorError::ComputationFailure("grouped key vanished during rollup".to_string())
        })?;
        let (account, namespace, container, window_start) = key;
        summaries.push(WindowSummary {
            account,
            namespace,
            container,
            window_start,
            cpu: summarize(group.cpu),
            memory: summarize(group.memory),
        });
    }

    Ok(summaries)
}

/// Reduce one non-empty group of values to its summary statistics
fn summarize(mut values: Vec<f64>) -> MetricStats {
    let sum: f64 = values.iter().sum();
    let avg = sum / values.len() as f64;

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    MetricStats {
        avg,
        min: values[0],
        max: values[values.len() - 1],
        p90: quantile(&values, 0.90),
        p95: quantile(&values, 0.95),
        p99: quantile(&values, 0.99),
    }
}

/// Nearest-rank quantile over an ascending-sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let idx = (q * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
