use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::session::Key;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum DojoEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait DojoEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DojoEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<DojoEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => DojoEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => DojoEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("terminal event stream ended: {}", e);
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DojoEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DojoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<DojoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DojoEvent>) -> Self {
        Self { rx }
    }
}

impl DojoEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DojoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: DojoEventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: DojoEventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> DojoEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => DojoEvent::Tick,
        }
    }
}

/// Map a terminal key event to a typing key.
///
/// Returns `None` for key releases, control chords and keys the session does
/// not understand (arrows, enter, ...); the app handles those itself.
pub fn translate_key(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            Some(Key::Shift)
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(Key::Char(c))
        }
        _ => None,
    }
}
