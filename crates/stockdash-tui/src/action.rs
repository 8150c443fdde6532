//! UI actions. Every state change in the app goes through one of these.

use std::sync::Arc;

use stockdash_core::{DashboardSnapshot, RefreshState};

use crate::screen::ScreenId;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,

    // ── Navigation ──
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Refresh ──
    /// Manual refresh request. Ignored while a fetch is in flight.
    Refresh,

    // ── Data (from the bridge) ──
    SnapshotUpdated(Arc<DashboardSnapshot>),
    RefreshStateChanged(RefreshState),
    /// `Some(message)` after a failed refresh, `None` once the next starts.
    ErrorChanged(Option<String>),
    SleepingChanged(bool),
}

impl Action {
    /// Data actions are delivered to every screen, not just the active one.
    pub fn is_data(&self) -> bool {
        matches!(self, Self::SnapshotUpdated(_) | Self::SleepingChanged(_))
    }
}
