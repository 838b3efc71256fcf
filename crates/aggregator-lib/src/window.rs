//! Aggregation windows and timestamp truncation
//!
//! The window policy defines the four supported rollup granularities and
//! how a timestamp truncates to its window boundary. Truncation is
//! deterministic, monotonic and idempotent; weeks start on Sunday and
//! months on the first, both at 00:00 UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AggregatorError;

/// Supported rollup granularities
///
/// Exactly these four; an unrecognized value is a configuration error,
/// never a runtime fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationWindow {
    Hour,
    Day,
    Week,
    Month,
}

impl AggregationWindow {
    /// All windows, in ascending span order
    pub const ALL: [AggregationWindow; 4] = [
        AggregationWindow::Hour,
        AggregationWindow::Day,
        AggregationWindow::Week,
        AggregationWindow::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationWindow::Hour => "hour",
            AggregationWindow::Day => "day",
            AggregationWindow::Week => "week",
            AggregationWindow::Month => "month",
        }
    }

    /// Truncate a timestamp to the start of its window
    pub fn truncate(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        match self {
            AggregationWindow::Hour => {
                start_of_day(date) + Duration::hours(i64::from(ts.hour()))
            }
            AggregationWindow::Day => start_of_day(date),
            AggregationWindow::Week => {
                let back = i64::from(date.weekday().num_days_from_sunday());
                start_of_day(date - Duration::days(back))
            }
            AggregationWindow::Month => start_of_day(date.with_day(1).unwrap_or(date)),
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl fmt::Display for AggregationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationWindow {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(AggregationWindow::Hour),
            "day" => Ok(AggregationWindow::Day),
            "week" => Ok(AggregationWindow::Week),
            "month" => Ok(AggregationWindow::Month),
            other => Err(AggregatorError::InvalidArgument(format!(
                "unrecognized aggregation window: {other}"
            ))),
        }
    }
}
