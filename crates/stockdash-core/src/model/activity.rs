use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::EnumString;

/// Trade direction as reported by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Buy,
    Sell,
    SellShort,
    /// Anything else, kept verbatim so it can still be displayed.
    #[strum(default)]
    Other(String),
}

impl Side {
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Upper-case label shown in the activity list.
    pub fn label(&self) -> String {
        match self {
            Self::Buy => "BUY".into(),
            Self::Sell => "SELL".into(),
            Self::SellShort => "SELL_SHORT".into(),
            Self::Other(raw) => raw.to_uppercase(),
        }
    }
}

/// A single fill, flattened out of its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    /// The group key the fill was listed under.
    pub id: String,
    pub side: Side,
    pub qty: f64,
    pub symbol: String,
    pub price: f64,
    pub transaction_time: DateTime<Utc>,
}
