//! Data layer between `stockdash-api` and the terminal dashboard.
//!
//! - **[`Dashboard`]**: refresh controller. [`start()`](Dashboard::start)
//!   runs the first fetch and a fixed-period timer; [`refresh()`](Dashboard::refresh)
//!   and [`trigger()`](Dashboard::trigger) share one reentrancy guard.
//!   Snapshots, errors, refresh state, and the sleep flag are published on
//!   `tokio::sync::watch` channels.
//!
//! - **[`series`]**: `trim_recent` / `downsample` / `prepare_chart`, the
//!   pure shaping applied to the equity history before charting.
//!
//! - **[`format`]**: locale-independent currency, number, percent, and
//!   timestamp formatting.
//!
//! - **[`SleepCheck`]**: cached query of the sleep-status proxy.
//!
//! - **Domain model** ([`model`]): `Account`, `EquitySample`, `Position`,
//!   `Activity` and the derived `PortfolioSummary`, `PositionRow`,
//!   `ChartPoint`, bundled per refresh into a [`DashboardSnapshot`].

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod format;
pub mod model;
pub mod series;
pub mod sleep_check;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, SeriesLimits, TlsVerification};
pub use controller::{Dashboard, RefreshOutcome, RefreshState};
pub use error::CoreError;
pub use sleep_check::{SleepCacheEntry, SleepCheck};
pub use snapshot::DashboardSnapshot;

pub use model::{
    Account, Activity, ChartPoint, EquitySample, PortfolioSummary, Position, PositionRow, Side,
};
