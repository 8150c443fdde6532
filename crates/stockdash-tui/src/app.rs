//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stockdash_core::format::fmt_datetime;
use stockdash_core::{Dashboard, RefreshState};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, Events};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Session;

/// `Last updated: 18/10/2026, 09:15:00 UTC`
pub fn last_updated_label(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "Not updated yet".to_owned(),
        |at| format!("Last updated: {} UTC", fmt_datetime(&at)),
    )
}

pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    refresh_state: RefreshState,
    /// Message of the last failed refresh; cleared when the next one starts.
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
    throbber_state: ThrobberState,
    dashboard: Dashboard,
    data_cancel: CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::Overview) {
            screen.set_focused(true);
        }

        Self {
            active_screen: ScreenId::Overview,
            screens,
            running: true,
            help_visible: false,
            refresh_state: RefreshState::Idle,
            error: None,
            last_updated: None,
            throbber_state: ThrobberState::default(),
            dashboard,
            data_cancel: CancellationToken::new(),
            action_tx,
            action_rx,
        }
    }

    /// Run until the user quits. Starts the dashboard through the data
    /// bridge and stops it on the way out.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = Session::open()?;
        debug!(size = ?session.dimensions(), "terminal ready");

        let bridge = tokio::spawn(crate::data_bridge::spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = Events::spawn(
            Duration::from_millis(150), // throbber
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render | Event::Resize => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    session.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        let _ = bridge.await;
        drop(events);
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first; anything unclaimed goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }

            // Disabled while a fetch is in flight.
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                return Ok(match self.refresh_state {
                    RefreshState::Idle => Some(Action::Refresh),
                    RefreshState::Fetching => None,
                });
            }

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Refresh => {
                if self.dashboard.trigger() {
                    debug!("manual refresh started");
                } else {
                    debug!("manual refresh ignored, fetch in flight");
                }
            }

            Action::Tick => {
                if self.refresh_state == RefreshState::Fetching {
                    self.throbber_state.calc_next();
                }
            }

            Action::RefreshStateChanged(state) => self.refresh_state = *state,

            Action::ErrorChanged(error) => self.error.clone_from(error),

            Action::Render => {}

            data @ (Action::SnapshotUpdated(_) | Action::SleepingChanged(_)) => {
                if let Action::SnapshotUpdated(snap) = data {
                    self.last_updated = Some(snap.updated_at);
                }
                self.broadcast(data)?;
            }
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        debug_assert!(action.is_data());
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Length(u16::from(self.error.is_some())), // error banner
            Constraint::Min(1),                                  // screen
            Constraint::Length(1),                               // tab bar
            Constraint::Length(1),                               // status bar
        ])
        .split(area);

        if let Some(ref message) = self.error {
            frame.render_widget(
                Paragraph::new(format!(" ✖ {message}")).style(theme::error_banner()),
                layout[0],
            );
        }

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_tab_bar(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Length(16), Constraint::Min(1)]).split(area);

        if self.refresh_state == RefreshState::Fetching {
            let throbber = Throbber::default()
                .label("refreshing")
                .style(Style::default().fg(theme::AMBER))
                .throbber_style(Style::default().fg(theme::HIGHLIGHT));
            frame.render_stateful_widget(throbber, cols[0], &mut self.throbber_state.clone());
        } else {
            let indicator = if self.error.is_some() {
                Span::styled(" ○ feed error", Style::default().fg(theme::LOSS))
            } else if self.last_updated.is_some() {
                Span::styled(" ● live", Style::default().fg(theme::GAIN))
            } else {
                Span::styled(" ○ waiting", theme::key_hint())
            };
            frame.render_widget(Paragraph::new(indicator), cols[0]);
        }

        let line = Line::from(vec![
            Span::styled("│ ", theme::key_hint()),
            Span::styled(last_updated_label(self.last_updated), theme::table_row()),
            Span::styled("  │ ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("help  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), cols[1]);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let height = 14u16.min(area.height.saturating_sub(4));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_PANEL));

    let binding = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let text = vec![
        Line::from(""),
        binding("1-3", "Jump to screen"),
        binding("Tab", "Next screen"),
        binding("j/k ↑/↓", "Move up/down"),
        binding("g/G", "Top / bottom"),
        Line::from(""),
        binding("r", "Refresh now"),
        binding("?", "This help"),
        binding("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("       Esc or ? to close", theme::key_hint())),
    ];

    frame.render_widget(Paragraph::new(text).block(block), help_area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use stockdash_core::{DashboardConfig, DashboardSnapshot, PortfolioSummary};

    use super::*;

    fn app() -> App {
        let config = DashboardConfig::new("http://127.0.0.1:9/feed.json".parse().unwrap());
        App::new(Dashboard::new(config).unwrap())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn snapshot() -> Arc<DashboardSnapshot> {
        Arc::new(DashboardSnapshot {
            summary: PortfolioSummary {
                equity: 20_500.0,
                cash: 300.0,
                original: 20_000.0,
                pl: 500.0,
                pl_percent: 0.025,
                last_change: None,
                last_change_percent: None,
                last_change_at: None,
            },
            chart: Vec::new(),
            positions: Vec::new(),
            activities: Vec::new(),
            history_len: 0,
            updated_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 15, 0).unwrap(),
        })
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn last_updated_label_is_utc() {
        assert_eq!(last_updated_label(None), "Not updated yet");
        assert_eq!(
            last_updated_label(Some(Utc.with_ymd_and_hms(2026, 10, 18, 9, 15, 0).unwrap())),
            "Last updated: 18/10/2026, 09:15:00 UTC"
        );
    }

    #[test]
    fn global_keys_map_to_actions() {
        let mut app = app();
        assert_eq!(
            app.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::Quit)
        );
        assert_eq!(
            app.handle_key_event(key(KeyCode::Char('2'))).unwrap(),
            Some(Action::SwitchScreen(ScreenId::Positions))
        );
        assert_eq!(
            app.handle_key_event(key(KeyCode::Tab)).unwrap(),
            Some(Action::SwitchScreen(ScreenId::Positions))
        );
        assert_eq!(app.handle_key_event(key(KeyCode::Char('9'))).unwrap(), None);
    }

    #[test]
    fn refresh_key_is_ignored_while_fetching() {
        let mut app = app();
        assert_eq!(
            app.handle_key_event(key(KeyCode::Char('r'))).unwrap(),
            Some(Action::Refresh)
        );

        app.process_action(&Action::RefreshStateChanged(RefreshState::Fetching))
            .unwrap();
        assert_eq!(app.handle_key_event(key(KeyCode::Char('r'))).unwrap(), None);
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        assert_eq!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap(), None);
        assert_eq!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ToggleHelp)
        );
    }

    #[test]
    fn switching_screens_updates_active_tab() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Activity))
            .unwrap();
        assert_eq!(app.active_screen, ScreenId::Activity);
        assert!(screen_text(&app).contains("No activity."));
    }

    #[test]
    fn snapshot_and_error_show_in_frame() {
        let mut app = app();
        assert!(screen_text(&app).contains("Not updated yet"));

        app.process_action(&Action::SnapshotUpdated(snapshot()))
            .unwrap();
        app.process_action(&Action::ErrorChanged(Some("Feed HTTP 503".into())))
            .unwrap();
        let text = screen_text(&app);
        assert!(text.contains("Last updated: 18/10/2026, 09:15:00 UTC"));
        assert!(text.contains("Feed HTTP 503"));
        assert!(text.contains("$20,500.00"));

        app.process_action(&Action::ErrorChanged(None)).unwrap();
        assert!(!screen_text(&app).contains("Feed HTTP 503"));
    }

    #[test]
    fn sleep_banner_follows_flag() {
        let mut app = app();
        app.process_action(&Action::SnapshotUpdated(snapshot()))
            .unwrap();
        app.process_action(&Action::SleepingChanged(true)).unwrap();
        assert!(screen_text(&app).contains("sleeping"));
        app.process_action(&Action::SleepingChanged(false)).unwrap();
        assert!(!screen_text(&app).contains("sleeping"));
    }
}
