// ── Domain model ──
//
// Canonical types the dashboard renders. Wire records from
// `stockdash-api` are normalized into these by `crate::convert`.

pub mod account;
pub mod activity;
pub mod equity;
pub mod position;

pub use account::{Account, DEFAULT_ORIGINAL_INVESTMENT, PortfolioSummary};
pub use activity::{Activity, Side};
pub use equity::{ChartPoint, EquitySample};
pub use position::{Position, PositionRow};
