use chrono::{DateTime, Utc};
use serde::Serialize;

/// One point of the account's equity history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquitySample {
    /// `None` when the feed's time could not be read. Such samples are still
    /// charted, just without a label.
    pub timestamp: Option<DateTime<Utc>>,
    pub equity: f64,
    /// Absolute change versus the previous sample (0 when not reported).
    pub change: f64,
    /// Fractional change versus the previous sample (0 when not reported).
    pub change_percent: f64,
}

impl EquitySample {
    pub fn new(timestamp: DateTime<Utc>, equity: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            equity,
            change: 0.0,
            change_percent: 0.0,
        }
    }
}

/// A chart-ready sample: the instant, its display labels, and the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: Option<DateTime<Utc>>,
    /// Full `dd/mm/yyyy, HH:MM:SS` label, or `n/a` without a timestamp.
    pub label: String,
    /// Time-only part of `label`, used on the x-axis.
    pub tick_label: String,
    pub equity: f64,
}
