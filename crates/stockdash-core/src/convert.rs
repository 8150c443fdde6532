// ── API-to-domain type conversions ──
//
// Bridges raw `stockdash_api` feed records into `stockdash_core::model`
// types. Lenient numbers become `f64`, timestamps become `DateTime<Utc>`,
// and the defaults the dashboard has always applied are filled in here.

use std::str::FromStr;

use indexmap::IndexMap;
use tracing::debug;

use stockdash_api::{
    AccountRecord, ActivityRecord, EquitySampleRecord, FlexNumber, FlexTimestamp, PositionRecord,
};

use crate::model::{Account, Activity, DEFAULT_ORIGINAL_INVESTMENT, EquitySample, Position, Side};

// ── Helpers ────────────────────────────────────────────────────────

fn optional(value: Option<&FlexNumber>) -> Option<f64> {
    value.map(FlexNumber::value)
}

fn or_zero(value: Option<&FlexNumber>) -> f64 {
    optional(value).filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Absent or null reads as 0; unparseable text stays `NaN` so it shows as
/// `n/a` rather than a plausible zero.
fn present_or_zero(value: Option<&FlexNumber>) -> f64 {
    optional(value).unwrap_or(0.0)
}

// ── Account ────────────────────────────────────────────────────────

impl From<&AccountRecord> for Account {
    fn from(raw: &AccountRecord) -> Self {
        let original = optional(raw.original_investment.as_ref())
            .filter(|v| *v != 0.0 && !v.is_nan())
            .unwrap_or(DEFAULT_ORIGINAL_INVESTMENT);

        Self {
            equity: present_or_zero(raw.equity.as_ref()),
            cash: present_or_zero(raw.cash.as_ref()),
            original_investment: original,
        }
    }
}

// ── Equity history ─────────────────────────────────────────────────

impl From<&EquitySampleRecord> for EquitySample {
    /// Lossless view of one wire sample: a missing equity is `NaN` and an
    /// unreadable timestamp is `None`.
    fn from(raw: &EquitySampleRecord) -> Self {
        Self {
            timestamp: raw.timestamp.as_ref().and_then(FlexTimestamp::to_utc),
            equity: optional(raw.equity.as_ref()).unwrap_or(f64::NAN),
            change: or_zero(raw.change.as_ref()),
            change_percent: or_zero(raw.change_percent.as_ref()),
        }
    }
}

/// Convert the full history, preserving order. Only samples without a finite
/// equity are dropped; a sample whose time cannot be read is kept unlabelled
/// so the newest value always reaches the chart.
pub fn history(raw: &[EquitySampleRecord]) -> Vec<EquitySample> {
    let samples: Vec<EquitySample> = raw
        .iter()
        .map(EquitySample::from)
        .filter(|s| s.equity.is_finite())
        .collect();
    if samples.len() != raw.len() {
        debug!(
            dropped = raw.len() - samples.len(),
            "skipped history samples without a numeric equity"
        );
    }
    samples
}

/// The feed's final sample as reported, even if it is not plottable.
pub fn latest_sample(raw: &[EquitySampleRecord]) -> Option<EquitySample> {
    raw.last().map(EquitySample::from)
}

// ── Positions ──────────────────────────────────────────────────────

impl From<&PositionRecord> for Position {
    fn from(raw: &PositionRecord) -> Self {
        Self {
            symbol: raw.symbol.clone(),
            qty: present_or_zero(raw.qty.as_ref()),
            market_value: present_or_zero(raw.market_value.as_ref()),
            cost_basis: present_or_zero(raw.cost_basis.as_ref()),
            current_price: present_or_zero(raw.current_price.as_ref()),
            lastday_price: present_or_zero(raw.lastday_price.as_ref()),
            change_today: optional(raw.change_today.as_ref()),
        }
    }
}

// ── Activities ─────────────────────────────────────────────────────

impl Activity {
    /// Convert one fill listed under `group`. The group key replaces the
    /// record's own id. Fills with an unreadable time are dropped.
    pub fn from_record(group: &str, raw: &ActivityRecord) -> Option<Self> {
        let transaction_time = raw.transaction_time.as_ref()?.to_utc()?;
        let side = Side::from_str(raw.side.trim()).unwrap_or_else(|_| Side::Other(raw.side.clone()));
        Some(Self {
            id: group.to_owned(),
            side,
            qty: present_or_zero(raw.qty.as_ref()),
            symbol: raw.symbol.clone(),
            price: present_or_zero(raw.price.as_ref()),
            transaction_time,
        })
    }
}

/// Flatten grouped activities, newest first, keeping at most `limit`.
///
/// The sort is stable, so fills sharing a timestamp keep document order.
pub fn recent_activities(
    groups: &IndexMap<String, Vec<ActivityRecord>>,
    limit: usize,
) -> Vec<Activity> {
    let mut items: Vec<Activity> = groups
        .iter()
        .flat_map(|(group, fills)| {
            fills
                .iter()
                .filter_map(move |raw| Activity::from_record(group, raw))
        })
        .collect();

    items.sort_by(|a, b| b.transaction_time.cmp(&a.transaction_time));
    items.truncate(limit);
    items
}
