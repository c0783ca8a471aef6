//! Terminal input for the viewer
//!
//! Reads whatever crossterm has queued without blocking, keeps only the
//! events the viewer reacts to, and collapses bursts of pointer motion and
//! resizes so a frame handles each at most once.

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

/// Input the viewer acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
}

impl Event {
    fn is_pointer_motion(&self) -> bool {
        matches!(self, Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved)
    }

    fn is_resize(&self) -> bool {
        matches!(self, Event::Resize { .. })
    }
}

/// Keep the terminal events the viewer has a use for
pub fn translate(event: event::Event) -> Option<Event> {
    match event {
        event::Event::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        event::Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::Moved
            | MouseEventKind::Down(MouseButton::Left) => Some(Event::Mouse(mouse)),
            _ => None,
        },
        event::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

/// Drop a motion or resize event when the next event is of the same kind
pub fn coalesce(events: Vec<Event>) -> Vec<Event> {
    let mut kept: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if let Some(last) = kept.last_mut() {
            let same_kind = (last.is_pointer_motion() && event.is_pointer_motion())
                || (last.is_resize() && event.is_resize());
            if same_kind {
                *last = event;
                continue;
            }
        }
        kept.push(event);
    }
    kept
}

/// Non-blocking reader over crossterm's queue
#[derive(Debug)]
pub struct EventHandler {
    max_per_frame: usize,
}

impl EventHandler {
    pub fn new(max_per_frame: usize) -> Self {
        Self { max_per_frame }
    }

    /// Everything queued right now, up to the per-frame limit
    pub fn drain(&self) -> anyhow::Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut read = 0;
        while read < self.max_per_frame && event::poll(Duration::ZERO)? {
            read += 1;
            if let Some(event) = translate(event::read()?) {
                events.push(event);
            }
        }
        Ok(coalesce(events))
    }
}
