//! Terminal event polling
//!
//! Turns crossterm input into [`TuiEvent`]s, producing a tick whenever the
//! tick interval passes without input so timed state (notifications) moves.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Input the event loop reacts to
#[derive(Debug, Clone)]
pub enum TuiEvent {
    Key(KeyEvent),

    Resize(u16, u16),

    /// No input within the tick interval
    Tick,
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Wait up to one tick for input
    pub fn next(&self) -> std::io::Result<TuiEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(TuiEvent::Tick);
        }

        match event::read()? {
            // Some terminals report releases too
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Ok(TuiEvent::Key(key)),
            CrosstermEvent::Resize(w, h) => Ok(TuiEvent::Resize(w, h)),
            _ => Ok(TuiEvent::Tick),
        }
    }
}
