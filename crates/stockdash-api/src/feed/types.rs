// Wire types for the portfolio feed.
//
// The feed is produced by a third-party job that mirrors brokerage data, so
// numeric fields show up both as JSON numbers and as numeric strings, and
// timestamps both as epoch seconds and as ISO-8601 strings. The `Flex*`
// helpers accept either shape. Per-row fields are optional so one null or
// missing value never rejects the whole document; `stockdash-core` decides
// what to keep when it converts rows into domain types.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A number that may be encoded as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlexNumber {
    Number(f64),
    Text(String),
}

impl FlexNumber {
    /// Numeric value; unparseable text yields `NaN`, mirroring how the feed
    /// was consumed historically.
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

/// ISO-8601 shapes seen in the feed besides strict RFC 3339.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// A timestamp encoded as epoch seconds or as an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlexTimestamp {
    EpochSeconds(f64),
    Text(String),
}

fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    let with_offset = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|at| at.with_timezone(&Utc));
    // No offset at all: read as UTC.
    with_offset.or_else(|| {
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|naive| naive.and_utc())
    })
}

impl FlexTimestamp {
    /// Resolve into a UTC instant, or `None` if the value is not a valid time.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EpochSeconds(secs) if secs.is_finite() => {
                let millis = (secs * 1000.0).round() as i64;
                Utc.timestamp_millis_opt(millis).single()
            }
            Self::EpochSeconds(_) => None,
            Self::Text(s) => parse_iso(s.trim()),
        }
    }
}

/// Full feed document: `{ account, history, positions, activities }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioFeed {
    #[serde(default)]
    pub account: AccountRecord,
    #[serde(default)]
    pub history: Vec<EquitySampleRecord>,
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
    /// Activities grouped under opaque keys, in document order.
    #[serde(default)]
    pub activities: IndexMap<String, Vec<ActivityRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default)]
    pub equity: Option<FlexNumber>,
    #[serde(default)]
    pub cash: Option<FlexNumber>,
    #[serde(default)]
    pub original_investment: Option<FlexNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquitySampleRecord {
    #[serde(default)]
    pub timestamp: Option<FlexTimestamp>,
    #[serde(default)]
    pub equity: Option<FlexNumber>,
    #[serde(default)]
    pub change: Option<FlexNumber>,
    #[serde(default)]
    pub change_percent: Option<FlexNumber>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub symbol: String,
    #[serde(default)]
    pub qty: Option<FlexNumber>,
    #[serde(default)]
    pub market_value: Option<FlexNumber>,
    #[serde(default)]
    pub cost_basis: Option<FlexNumber>,
    #[serde(default)]
    pub current_price: Option<FlexNumber>,
    #[serde(default)]
    pub lastday_price: Option<FlexNumber>,
    #[serde(default)]
    pub change_today: Option<FlexNumber>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub side: String,
    #[serde(default)]
    pub qty: Option<FlexNumber>,
    pub symbol: String,
    #[serde(default)]
    pub price: Option<FlexNumber>,
    #[serde(default)]
    pub transaction_time: Option<FlexTimestamp>,
}
