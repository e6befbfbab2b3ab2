#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Maps one key press to a UI event. Anything without a binding goes to the
/// prompt as text input.
pub fn key_event(input: Input) -> Event {
    match input {
        Input { key: Key::Down, .. } | Input { key: Key::MouseScrollDown, .. } => {
            return Event::UIScrollDown();
        }
        Input { key: Key::Up, .. } | Input { key: Key::MouseScrollUp, .. } => {
            return Event::UIScrollUp();
        }
        Input { key: Key::PageDown, .. }
        | Input {
            key: Key::Char('d'),
            ctrl: true,
            ..
        } => {
            return Event::UIScrollPageDown();
        }
        Input { key: Key::PageUp, .. }
        | Input {
            key: Key::Char('u'),
            ctrl: true,
            ..
        } => {
            return Event::UIScrollPageUp();
        }
        Input {
            key: Key::Char('c'),
            ctrl: true,
            ..
        } => {
            return Event::KeyboardCTRLC();
        }
        Input {
            key: Key::Enter, ..
        } => {
            return Event::KeyboardEnter();
        }
        Input { key: Key::Esc, .. } => {
            return Event::KeyboardEsc();
        }
        input => {
            return Event::KeyboardCharInput(input);
        }
    }
}

/// Merges terminal input, worker events and a UI tick into one stream.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
            CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            CrosstermEvent::Key(key_press) => return Some(key_event(key_press.into())),
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(TICK_INTERVAL) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
