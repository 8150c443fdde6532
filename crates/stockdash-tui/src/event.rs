//! Input pump: crossterm events and the two UI clocks, merged onto one
//! channel by a background task.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    /// Key press. Releases and repeats are filtered out.
    Key(KeyEvent),
    Resize,
    /// Throbber frame.
    Tick,
    Render,
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

fn translate(raw: TermEvent) -> Option<Event> {
    match raw {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(..) => Some(Event::Resize),
        _ => None,
    }
}

async fn pump(
    out: UnboundedSender<Event>,
    stop: CancellationToken,
    tick_every: Duration,
    render_every: Duration,
) {
    let mut input = EventStream::new();
    let mut tick = clock(tick_every);
    let mut frame = clock(render_every);

    loop {
        let next = tokio::select! {
            () = stop.cancelled() => return,
            _ = tick.tick() => Some(Event::Tick),
            _ = frame.tick() => Some(Event::Render),
            raw = input.next() => match raw {
                Some(Ok(raw)) => translate(raw),
                Some(Err(_)) => None,
                // stdin closed
                None => return,
            },
        };

        if let Some(event) = next {
            if out.send(event).is_err() {
                return;
            }
        }
    }
}

/// Receiving end of the pump. Dropping it stops the background task.
pub struct Events {
    inbox: UnboundedReceiver<Event>,
    stop: CancellationToken,
}

impl Events {
    pub fn spawn(tick_every: Duration, render_every: Duration) -> Self {
        let (out, inbox) = mpsc::unbounded_channel();
        let stop = CancellationToken::new();
        tokio::spawn(pump(out, stop.clone(), tick_every, render_every));
        Self { inbox, stop }
    }

    /// `None` once the pump has exited.
    pub async fn next(&mut self) -> Option<Event> {
        self.inbox.recv().await
    }
}

impl Drop for Events {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    fn key(kind: KeyEventKind) -> TermEvent {
        TermEvent::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn only_key_presses_and_resizes_get_through() {
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(Event::Key(_))));
        assert!(translate(key(KeyEventKind::Release)).is_none());
        assert!(translate(key(KeyEventKind::Repeat)).is_none());
        assert!(matches!(translate(TermEvent::Resize(80, 24)), Some(Event::Resize)));
        assert!(translate(TermEvent::FocusGained).is_none());
    }
}
