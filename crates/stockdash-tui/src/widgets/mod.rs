//! Reusable widgets shared by the screens.

pub mod equity_chart;
pub mod summary;
