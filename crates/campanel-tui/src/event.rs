//! Terminal input pump.
//!
//! A background task merges key presses from crossterm with two timers: a
//! tick that drives the throbber and toast expiry, and a render beat. The
//! terminal redraws on every render beat, so resizes need no event of their
//! own.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Render,
}

/// Only key presses reach the app. Releases and repeats (reported by some
/// terminals) would double every keystroke.
fn translate(event: &CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(*key)),
        _ => None,
    }
}

fn beat(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Stops its background task when dropped.
pub struct EventPump {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventPump {
    pub fn start(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let stopped = cancel.clone();

        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut tick = beat(tick_rate);
            let mut render = beat(render_rate);

            loop {
                let event = tokio::select! {
                    () = stopped.cancelled() => break,
                    _ = tick.tick() => Event::Tick,
                    _ = render.tick() => Event::Render,
                    Some(Ok(raw)) = input.next() => match translate(&raw) {
                        Some(event) => event,
                        None => continue,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn only_key_presses_are_forwarded() {
        assert!(matches!(
            translate(&key(KeyEventKind::Press)),
            Some(Event::Key(k)) if k.code == KeyCode::Char('r')
        ));
        assert!(translate(&key(KeyEventKind::Release)).is_none());
        assert!(translate(&key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn resize_and_focus_are_dropped() {
        assert!(translate(&CrosstermEvent::Resize(120, 40)).is_none());
        assert!(translate(&CrosstermEvent::FocusGained).is_none());
    }
}
