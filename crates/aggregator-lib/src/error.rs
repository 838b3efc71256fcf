//! Error type shared across the aggregation core

use thiserror::Error;

/// Errors surfaced by the aggregation core
///
/// An account with no registered namespaces is not an error condition;
/// directory lookups return an empty set instead.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Malformed identifier or unrecognized aggregation window
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store could not be reached or timed out
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Aggregate results had an unexpected shape (missing field,
    /// non-finite value)
    #[error("computation failure: {0}")]
    ComputationFailure(String),
}

impl AggregatorError {
    /// Short machine-readable kind, used in logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            AggregatorError::InvalidArgument(_) => "invalid_argument",
            AggregatorError::StoreUnavailable(_) => "store_unavailable",
            AggregatorError::ComputationFailure(_) => "computation_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(
            AggregatorError::InvalidArgument("x".into()).kind(),
            "invalid_argument"
        );
        assert_eq!(
            AggregatorError::StoreUnavailable("x".into()).kind(),
            "store_unavailable"
        );
        assert_eq!(
            AggregatorError::ComputationFailure("x".into()).kind(),
            "computation_failure"
        );
    }

    #[test]
    fn test_error_display_includes_detail() {
        let err = AggregatorError::StoreUnavailable("connection refused".into());
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }
}
