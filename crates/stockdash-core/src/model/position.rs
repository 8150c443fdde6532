use serde::Serialize;

/// One open position, replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub symbol: String,
    pub qty: f64,
    pub market_value: f64,
    pub cost_basis: f64,
    pub current_price: f64,
    pub lastday_price: f64,
    /// Broker-reported intraday change fraction, when present.
    pub change_today: Option<f64>,
}

impl Position {
    /// Intraday change fraction.
    ///
    /// Prefers the reported `change_today` when it is finite and non-zero,
    /// otherwise derives it from the previous close. A zero previous close
    /// yields 0.
    pub fn day_change(&self) -> f64 {
        match self.change_today {
            Some(reported) if reported.is_finite() && reported != 0.0 => reported,
            _ if self.lastday_price != 0.0 && self.lastday_price.is_finite() => {
                (self.current_price - self.lastday_price) / self.lastday_price
            }
            _ => 0.0,
        }
    }
}

/// A position together with its derived day change, as shown in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRow {
    pub position: Position,
    pub day_change: f64,
}

impl From<Position> for PositionRow {
    fn from(position: Position) -> Self {
        let day_change = position.day_change();
        Self {
            position,
            day_change,
        }
    }
}
