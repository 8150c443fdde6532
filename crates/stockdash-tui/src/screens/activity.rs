//! Activity screen: most recent trades, newest first.

use std::sync::Arc;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use stockdash_core::format::{fmt_currency, fmt_datetime, fmt_number};
use stockdash_core::{Activity, DashboardSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// `BUY 3 AAPL @ $123.00`
pub fn headline(activity: &Activity) -> String {
    format!(
        "{} {} {} @ {}",
        activity.side.label(),
        fmt_number(activity.qty),
        activity.symbol,
        fmt_currency(activity.price),
    )
}

#[derive(Default)]
pub struct ActivityScreen {
    focused: bool,
    snapshot: Option<Arc<DashboardSnapshot>>,
    list_state: ListState,
}

impl ActivityScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn activities(&self) -> &[Activity] {
        self.snapshot
            .as_deref()
            .map(|s| s.activities.as_slice())
            .unwrap_or_default()
    }

    fn scroll(&mut self, down: bool) {
        let len = self.activities().len();
        if len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            None => 0,
            Some(i) if down => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
        };
        self.list_state.select(Some(next));
    }
}

impl Component for ActivityScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll(true),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(false),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snap) = action {
            self.snapshot = Some(Arc::clone(snap));
            // New trades land on top; jump back to the newest.
            self.list_state.select(None);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let activities = self.activities();
        let block = Block::default()
            .title(format!(" Recent activity ({}) ", activities.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if activities.is_empty() {
            frame.render_widget(
                Paragraph::new("  No activity.")
                    .style(theme::key_hint())
                    .block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = activities
            .iter()
            .map(|a| {
                let when = fmt_datetime(&a.transaction_time.with_timezone(&Local));
                ListItem::new(vec![
                    Line::from(Span::styled(
                        headline(a),
                        Style::default()
                            .fg(theme::TEXT)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {when}"),
                        theme::delta(!a.side.is_buy()),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::table_selected());

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use stockdash_core::Side;

    use super::*;

    fn activity(side: Side, qty: f64) -> Activity {
        Activity {
            id: "grp".into(),
            side,
            qty,
            symbol: "TSLA".into(),
            price: 1234.5,
            transaction_time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn headline_reads_like_a_ticket() {
        assert_eq!(
            headline(&activity(Side::Buy, 2.5)),
            "BUY 2.5 TSLA @ $1,234.50"
        );
        assert_eq!(
            headline(&activity(Side::Other("exercise".into()), 1.0)),
            "EXERCISE 1 TSLA @ $1,234.50"
        );
    }

    #[test]
    fn scrolling_stays_in_bounds() {
        let mut screen = ActivityScreen::new();
        screen.scroll(true);
        assert_eq!(screen.list_state.selected(), None);

        let snap = DashboardSnapshot {
            summary: stockdash_core::PortfolioSummary {
                equity: 0.0,
                cash: 0.0,
                original: 0.0,
                pl: 0.0,
                pl_percent: 0.0,
                last_change: None,
                last_change_percent: None,
                last_change_at: None,
            },
            chart: Vec::new(),
            positions: Vec::new(),
            activities: vec![activity(Side::Buy, 1.0), activity(Side::Sell, 1.0)],
            history_len: 0,
            updated_at: Utc::now(),
        };
        screen
            .update(&Action::SnapshotUpdated(Arc::new(snap)))
            .unwrap();
        screen.scroll(true);
        screen.scroll(true);
        screen.scroll(true);
        assert_eq!(screen.list_state.selected(), Some(1));
        screen.scroll(false);
        screen.scroll(false);
        assert_eq!(screen.list_state.selected(), Some(0));
    }
}
