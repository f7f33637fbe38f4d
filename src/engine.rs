use chrono::{DateTime, Local};
use std::time::Duration;

use crate::clock::Clock;
use crate::navigation::Navigator;
use crate::record::CompletedRecord;
use crate::sentence::{Sentence, SentenceSet};
use crate::session::{Key, KeyOutcome, Phase, SessionState};
use crate::sink::RecordSink;

/// Result of feeding one key to the [`Engine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    Ignored,
    Updated,
    Started,
    Completed(CompletedRecord),
}

/// Typing engine for a run over an ordered sentence list.
///
/// Owns the cursor and the current [`SessionState`]; every navigation action
/// replaces the session wholesale. Completed attempts are handed to the
/// [`RecordSink`] and never waited on.
pub struct Engine {
    sentences: SentenceSet,
    navigator: Navigator,
    session: SessionState,
    user_id: i64,
    clock: Box<dyn Clock>,
    sink: Box<dyn RecordSink>,
}

impl Engine {
    pub fn new(
        sentences: SentenceSet,
        user_id: i64,
        clock: Box<dyn Clock>,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        let navigator = Navigator::new(sentences.len());
        let session = SessionState::new(&text_at(&sentences, 0));
        Self {
            sentences,
            navigator,
            session,
            user_id,
            clock,
            sink,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn cursor(&self) -> usize {
        self.navigator.cursor()
    }

    pub fn sentence_count(&self) -> usize {
        self.navigator.sentence_count()
    }

    pub fn is_first(&self) -> bool {
        self.navigator.is_first()
    }

    pub fn is_last(&self) -> bool {
        self.navigator.is_last()
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn current_sentence(&self) -> Option<&Sentence> {
        self.sentences.get(self.navigator.cursor())
    }

    /// Reset the current sentence and begin accepting input.
    pub fn start(&mut self) {
        self.restart_session();
        tracing::info!(cursor = self.cursor(), "start");
    }

    /// Move to the next sentence (clamped at the last) and reset.
    pub fn next(&mut self) {
        let moved = self.navigator.next();
        self.restart_session();
        tracing::info!(cursor = self.cursor(), moved, "next");
    }

    /// Move to the previous sentence (clamped at the first) and reset.
    pub fn back(&mut self) {
        let moved = self.navigator.back();
        self.restart_session();
        tracing::info!(cursor = self.cursor(), moved, "back");
    }

    /// Time since the clock started for the current attempt, read from the
    /// engine's [`Clock`]
    pub fn elapsed(&self) -> Option<Duration> {
        let started = self.session.started_at?;
        Some(self.clock.now().duration_since(started).unwrap_or_default())
    }

    fn restart_session(&mut self) {
        let text = text_at(&self.sentences, self.navigator.cursor());
        self.session = self.session.start(&text);
    }

    pub fn key_press(&mut self, key: Key) -> EngineOutcome {
        let now = self.clock.now();
        match self.session.key_press(key, now) {
            KeyOutcome::Ignored => EngineOutcome::Ignored,
            KeyOutcome::Updated => {
                tracing::debug!(typed = self.session.pressed_keys.len(), "key");
                EngineOutcome::Updated
            }
            KeyOutcome::Started => {
                tracing::debug!(cursor = self.cursor(), "clock started");
                EngineOutcome::Started
            }
            KeyOutcome::Completed { wpm, elapsed } => {
                let sentence_id = self.current_sentence().map(|s| s.id).unwrap_or_default();
                let record = CompletedRecord::new(
                    sentence_id,
                    self.user_id,
                    wpm,
                    DateTime::<Local>::from(now),
                );
                tracing::info!(
                    sentence_id,
                    wpm = record.wpm,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "sentence completed"
                );
                if !wpm.is_finite() {
                    // zero elapsed time; a saturated score would pin the best forever
                    tracing::warn!(sentence_id, "not saving record with non-finite wpm");
                } else if let Err(e) = self.sink.submit(record.clone()) {
                    tracing::warn!("record submission failed: {}", e);
                }
                EngineOutcome::Completed(record)
            }
        }
    }
}

fn text_at(sentences: &SentenceSet, idx: usize) -> String {
    sentences
        .get(idx)
        .map(|s| s.text.clone())
        .unwrap_or_default()
}
