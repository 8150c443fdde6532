// ── Refresh snapshot ──
//
// Everything one successful refresh produces, built in a single pass from
// the parsed feed. The TUI renders snapshots; it never sees wire types.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use stockdash_api::PortfolioFeed;

use crate::config::SeriesLimits;
use crate::convert;
use crate::model::{Account, Activity, ChartPoint, Position, PortfolioSummary, PositionRow};
use crate::series;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub summary: PortfolioSummary,
    pub chart: Vec<ChartPoint>,
    pub positions: Vec<PositionRow>,
    /// Newest first, already truncated for display.
    pub activities: Vec<Activity>,
    /// History rows in the feed, before any are dropped or trimmed.
    pub history_len: usize,
    pub updated_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Build a snapshot with chart labels in the local time zone.
    pub fn build(
        feed: &PortfolioFeed,
        limits: SeriesLimits,
        activity_limit: usize,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self::build_in(feed, limits, activity_limit, updated_at, &Local)
    }

    pub fn build_in<Tz>(
        feed: &PortfolioFeed,
        limits: SeriesLimits,
        activity_limit: usize,
        updated_at: DateTime<Utc>,
        tz: &Tz,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let account = Account::from(&feed.account);
        let history = convert::history(&feed.history);
        let latest = convert::latest_sample(&feed.history);

        Self {
            summary: PortfolioSummary::new(&account, latest.as_ref()),
            chart: series::prepare_chart_in(&history, limits, tz),
            positions: feed
                .positions
                .iter()
                .map(|p| PositionRow::from(Position::from(p)))
                .collect(),
            activities: convert::recent_activities(&feed.activities, activity_limit),
            history_len: feed.history.len(),
            updated_at,
        }
    }
}
