//! Report folding
//!
//! Regroups per-container window summaries into one report document per
//! (account, namespace), tagged with the window the summaries were
//! computed for. A fold call always operates over summaries of a single
//! granularity, so the tag is supplied rather than inferred.

use std::collections::HashMap;

use crate::models::{ReportDocument, WindowSummary};
use crate::window::AggregationWindow;

/// Fold window summaries into report documents
///
/// Documents come out in first-seen (account, namespace) order and their
/// entries preserve the input sequence's order, which is chronological
/// when the input is the rollup pipeline's output. An empty input yields
/// an empty vec.
pub fn fold(summaries: Vec<WindowSummary>, window: AggregationWindow) -> Vec<ReportDocument> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut documents: Vec<ReportDocument> = Vec::new();

    for summary in summaries {
        let key = (summary.account.clone(), summary.namespace.clone());
        let position = *index.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            documents.push(ReportDocument {
                account: key.0,
                namespace: key.1,
                window_type: window,
                entries: Vec::new(),
            });
            documents.len() - 1
        });
        documents[position].entries.push(summary.into());
    }

    documents
}
