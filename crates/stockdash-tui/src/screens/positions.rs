//! Positions screen: one row per open position with its day change.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use stockdash_core::format::{fmt_currency, fmt_number, fmt_percent};
use stockdash_core::{DashboardSnapshot, PositionRow};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const HEADERS: [&str; 7] = [
    "Symbol",
    "Qty",
    "Market value",
    "Cost basis",
    "Price",
    "Prev close",
    "Day",
];

/// `▲ 1.23%` / `▼ 0.50%`. Zero counts as up.
pub fn day_change_label(change: f64) -> String {
    let arrow = if change < 0.0 { "▼" } else { "▲" };
    format!("{arrow} {}", fmt_percent(change.abs()))
}

fn cells(row: &PositionRow) -> [String; 7] {
    let p = &row.position;
    [
        p.symbol.clone(),
        fmt_number(p.qty),
        fmt_currency(p.market_value),
        fmt_currency(p.cost_basis),
        fmt_currency(p.current_price),
        fmt_currency(p.lastday_price),
        day_change_label(row.day_change),
    ]
}

#[derive(Default)]
pub struct PositionsScreen {
    focused: bool,
    snapshot: Option<Arc<DashboardSnapshot>>,
    table_state: TableState,
}

impl PositionsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> &[PositionRow] {
        self.snapshot
            .as_deref()
            .map(|s| s.positions.as_slice())
            .unwrap_or_default()
    }

    fn select(&mut self, idx: usize) {
        let len = self.rows().len();
        let clamped = if len == 0 { None } else { Some(idx.min(len - 1)) };
        self.table_state.select(clamped);
    }

    fn move_selection(&mut self, down: bool) {
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            current.saturating_add(1)
        } else {
            current.saturating_sub(1)
        };
        self.select(next);
    }
}

impl Component for PositionsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snap) = action {
            self.snapshot = Some(Arc::clone(snap));
            // Keep the cursor on a valid row when the list shrinks.
            let selected = self.table_state.selected().unwrap_or(0);
            self.select(selected);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = self.rows();
        let block = Block::default()
            .title(format!(" Positions ({}) ", rows.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new("  No positions.").style(theme::key_hint()),
                layout[0],
            );
            return;
        }

        let header = Row::new(
            HEADERS
                .iter()
                .map(|h| Cell::from(*h).style(theme::table_header())),
        );

        let body = rows.iter().map(|row| {
            let [symbol, qty, value, cost, price, prev, day] = cells(row);
            Row::new(vec![
                Cell::from(symbol).style(
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Cell::from(qty),
                Cell::from(value),
                Cell::from(cost),
                Cell::from(price),
                Cell::from(prev),
                Cell::from(day).style(theme::delta(row.day_change < 0.0)),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Min(8),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(10),
        ];

        let table = Table::new(body, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("g/G ", theme::key_hint_key()),
            Span::styled("top/bottom", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stockdash_core::Position;

    use super::*;

    #[test]
    fn day_change_uses_arrows_and_absolute_percent() {
        assert_eq!(day_change_label(0.0123), "▲ 1.23%");
        assert_eq!(day_change_label(-0.005), "▼ 0.50%");
        assert_eq!(day_change_label(0.0), "▲ 0.00%");
    }

    #[test]
    fn cells_format_every_column() {
        let row = PositionRow::from(Position {
            symbol: "AAPL".into(),
            qty: 3.0,
            market_value: 1_500.0,
            cost_basis: 1_400.0,
            current_price: 500.0,
            lastday_price: 400.0,
            change_today: None,
        });
        assert_eq!(
            cells(&row),
            [
                "AAPL",
                "3",
                "$1,500.00",
                "$1,400.00",
                "$500.00",
                "$400.00",
                "▲ 25.00%",
            ]
            .map(String::from)
        );
    }
}
