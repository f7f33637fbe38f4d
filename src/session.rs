use std::time::{Duration, SystemTime};

use crate::matcher::{is_fully_matched, match_keys};

/// Characters per "word" in the words-per-minute convention
pub const CHARS_PER_WORD: f64 = 5.0;

/// A single keystroke as seen by the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    /// Modifier press on its own; never changes state
    Shift,
}

impl Key {
    /// Parse a browser-style key name: "Shift", "Backspace" or one character.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Shift" => Some(Key::Shift),
            "Backspace" => Some(Key::Backspace),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No attempt started
    Idle,
    /// Accepting input, clock not running yet
    Playing,
    /// Clock running, at least one key recorded
    Active,
    /// Everything typed and correct
    Completed,
}

/// What a keystroke did to the session
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyOutcome {
    /// Shift: nothing changed
    Ignored,
    Updated,
    /// First forward key from an empty sequence, clock started
    Started,
    Completed { wpm: f64, elapsed: Duration },
}

/// Per-sentence typing progress.
///
/// One value exists per attempt; starting over or moving to another sentence
/// replaces it wholesale through [`SessionState::new`] or [`SessionState::reset`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    target: Vec<char>,
    pub pressed_keys: Vec<char>,
    pub match_results: Vec<bool>,
    pub is_playing: bool,
    pub started_at: Option<SystemTime>,
    pub wpm: f64,
}

impl SessionState {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.chars().collect(),
            pressed_keys: Vec::new(),
            match_results: Vec::new(),
            is_playing: false,
            started_at: None,
            wpm: 0.0,
        }
    }

    /// Fresh state for `target`; the playing flag survives so navigation
    /// keeps an active run going.
    pub fn reset(&self, target: &str) -> Self {
        Self {
            is_playing: self.is_playing,
            ..Self::new(target)
        }
    }

    /// Reset and begin accepting input.
    pub fn start(&self, target: &str) -> Self {
        let mut next = self.reset(target);
        next.is_playing = true;
        next
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        is_fully_matched(&self.match_results, self.target.len())
    }

    pub fn phase(&self) -> Phase {
        if !self.is_playing {
            Phase::Idle
        } else if self.started_at.is_none() || self.pressed_keys.is_empty() {
            // backspacing to empty leaves `started_at` set until the next key
            Phase::Playing
        } else if self.is_complete() {
            Phase::Completed
        } else {
            Phase::Active
        }
    }

    /// Apply one keystroke at time `now`.
    pub fn key_press(&mut self, key: Key, now: SystemTime) -> KeyOutcome {
        let previous_len = self.pressed_keys.len();

        let mut candidate = self.pressed_keys.clone();
        match key {
            Key::Shift => return KeyOutcome::Ignored,
            Key::Backspace => {
                candidate.pop();
            }
            Key::Char(c) => candidate.push(c),
        }

        self.match_results = match_keys(&candidate, &self.target);
        self.pressed_keys = candidate;

        self.evaluate_timing(previous_len, now)
    }

    fn evaluate_timing(&mut self, previous_len: usize, now: SystemTime) -> KeyOutcome {
        let mut outcome = KeyOutcome::Updated;

        if previous_len == 0 && self.pressed_keys.len() == 1 {
            self.started_at = Some(now);
            outcome = KeyOutcome::Started;
        }

        if let Some(started_at) = self.started_at {
            if self.is_complete() {
                let elapsed = now.duration_since(started_at).unwrap_or_default();
                self.wpm = compute_wpm(self.target.len(), elapsed);
                outcome = KeyOutcome::Completed {
                    wpm: self.wpm,
                    elapsed,
                };
            }
        }

        outcome
    }
}

/// Words per minute for `target_len` characters typed in `elapsed`, rounded.
///
/// Elapsed time is taken at millisecond resolution. Zero elapsed time is not
/// guarded and yields `f64::INFINITY`.
pub fn compute_wpm(target_len: usize, elapsed: Duration) -> f64 {
    let elapsed_secs = elapsed.as_millis() as f64 / 1000.0;
    ((target_len as f64 / CHARS_PER_WORD) * (60.0 / elapsed_secs)).round()
}
