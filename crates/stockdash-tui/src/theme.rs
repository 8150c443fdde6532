//! Ticker-tape palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(97, 175, 239); // #61afef
pub const HIGHLIGHT: Color = Color::Rgb(198, 120, 221); // #c678dd
pub const GAIN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const LOSS: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const AMBER: Color = Color::Rgb(229, 192, 123); // #e5c07b

// ── Neutrals ──────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(200, 204, 212); // #c8ccd4
pub const MUTED: Color = Color::Rgb(92, 99, 112); // #5c6370
pub const BG_PANEL: Color = Color::Rgb(33, 37, 43); // #21252b
pub const BG_SELECTED: Color = Color::Rgb(44, 49, 58); // #2c313a

/// Area fill under the equity line.
pub const EQUITY_FILL: Color = Color::Rgb(24, 52, 74);

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(HIGHLIGHT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(HIGHLIGHT)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

/// Key hint text (e.g. "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Green for gains, red for losses. Zero counts as a gain.
pub fn delta(negative: bool) -> Style {
    Style::default().fg(if negative { LOSS } else { GAIN })
}

pub fn error_banner() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(LOSS)
        .add_modifier(Modifier::BOLD)
}

pub fn sleep_banner() -> Style {
    Style::default().fg(BG_PANEL).bg(AMBER).add_modifier(Modifier::BOLD)
}
