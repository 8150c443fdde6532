use chrono::{DateTime, Utc};
use serde::Serialize;

use super::equity::EquitySample;

/// Starting capital assumed when the feed omits it or reports zero.
pub const DEFAULT_ORIGINAL_INVESTMENT: f64 = 20_000.0;

/// Account totals as of the latest feed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Account {
    pub equity: f64,
    pub cash: f64,
    pub original_investment: f64,
}

/// Headline numbers for the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub equity: f64,
    pub cash: f64,
    pub original: f64,
    /// `equity - original`.
    pub pl: f64,
    /// `pl / original`, or 0 when `original` is 0.
    pub pl_percent: f64,
    pub last_change: Option<f64>,
    pub last_change_percent: Option<f64>,
    pub last_change_at: Option<DateTime<Utc>>,
}

impl PortfolioSummary {
    /// Derive the summary from the account and the feed's final history
    /// sample, taken before any filtering or trimming.
    pub fn new(account: &Account, latest: Option<&EquitySample>) -> Self {
        let original = account.original_investment;
        let pl = account.equity - original;
        let pl_percent = if original == 0.0 { 0.0 } else { pl / original };

        Self {
            equity: account.equity,
            cash: account.cash,
            original,
            pl,
            pl_percent,
            last_change: latest.map(|s| s.change),
            last_change_percent: latest.map(|s| s.change_percent),
            last_change_at: latest.and_then(|s| s.timestamp),
        }
    }
}
