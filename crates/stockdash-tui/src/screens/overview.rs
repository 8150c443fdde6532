//! Overview screen: sleep banner, summary cards, and the equity chart.
//!
//! Layout:
//! ┌─ sleep banner (only while sleeping) ─────────────────────────────┐
//! ├─ Portfolio value ─┬─ Cash ─┬─ P/L ─┬─ Last change ───────────────┤
//! ├─ Equity chart ───────────────────────────────────────────────────┤
//! └──────────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use stockdash_core::DashboardSnapshot;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{equity_chart, summary};

#[derive(Default)]
pub struct OverviewScreen {
    snapshot: Option<Arc<DashboardSnapshot>>,
    sleeping: bool,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for OverviewScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snap) => self.snapshot = Some(Arc::clone(snap)),
            Action::SleepingChanged(flag) => self.sleeping = *flag,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(u16::from(self.sleeping)),
            Constraint::Length(5), // cards
            Constraint::Min(6),    // chart
        ])
        .split(area);

        if self.sleeping {
            summary::render_sleep_banner(frame, rows[0]);
        }

        let Some(snap) = self.snapshot.as_deref() else {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default());
            frame.render_widget(
                Paragraph::new("  Waiting for the first refresh…")
                    .style(theme::key_hint())
                    .block(block),
                rows[1].union(rows[2]),
            );
            return;
        };

        summary::render_cards(frame, rows[1], &snap.summary);
        equity_chart::render(frame, rows[2], &snap.chart);
    }
}
