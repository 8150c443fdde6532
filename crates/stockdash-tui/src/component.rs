//! What every screen implements so the app can route keys, data and paint.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

pub trait Component: Send {
    /// Keys the app's global bindings left alone. Returning an action
    /// queues it for dispatch.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a dispatched action. The active screen sees everything; the
    /// others only see data actions.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Called when the screen becomes (or stops being) the active tab.
    fn set_focused(&mut self, _focused: bool) {}
}
