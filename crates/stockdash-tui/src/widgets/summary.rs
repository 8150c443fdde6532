//! Summary cards and the sleep banner for the overview screen.

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use stockdash_core::PortfolioSummary;
use stockdash_core::format::{fmt_currency, fmt_datetime, fmt_percent, is_negative_display};

use crate::theme;

/// One headline figure with an optional delta and caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub value: String,
    pub delta: Option<String>,
    pub caption: Option<String>,
}

/// Portfolio value, cash, P/L and last change, in display order.
pub fn cards(summary: &PortfolioSummary) -> [Card; 4] {
    let last_change = Card {
        title: "Last change",
        value: fmt_currency(summary.last_change.unwrap_or(0.0)),
        delta: Some(fmt_percent(summary.last_change_percent.unwrap_or(0.0))),
        caption: summary.last_change_at.map(|at| format!("At {}", local_time(at))),
    };
    [
        Card {
            title: "Portfolio value",
            value: fmt_currency(summary.equity),
            delta: None,
            caption: Some(format!("Invested {}", fmt_currency(summary.original))),
        },
        Card {
            title: "Cash",
            value: fmt_currency(summary.cash),
            delta: None,
            caption: None,
        },
        Card {
            title: "P/L",
            value: fmt_currency(summary.pl),
            delta: Some(fmt_percent(summary.pl_percent)),
            caption: None,
        },
        last_change,
    ]
}

fn local_time(at: DateTime<Utc>) -> String {
    fmt_datetime(&at.with_timezone(&Local))
}

pub fn render_cards(frame: &mut Frame, area: Rect, summary: &PortfolioSummary) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for (card, col) in cards(summary).iter().zip(columns.iter()) {
        render_card(frame, *col, card);
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", card.title), theme::title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let mut value_line = vec![Span::styled(
        card.value.clone(),
        Style::default()
            .fg(theme::TEXT)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(ref delta) = card.delta {
        value_line.push(Span::raw("  "));
        value_line.push(Span::styled(
            delta.clone(),
            theme::delta(is_negative_display(delta)),
        ));
    }

    let mut lines = vec![Line::from(value_line)];
    if let Some(ref caption) = card.caption {
        lines.push(Line::from(Span::styled(caption.clone(), theme::key_hint())));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Full-width banner shown while the broadcaster is asleep.
pub fn render_sleep_banner(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new("☾  The streamer is sleeping. Trading continues on autopilot.")
            .alignment(Alignment::Center)
            .style(theme::sleep_banner())
            .block(Block::default().borders(Borders::NONE)),
        area,
    );
}
