use crate::clock::{SharedClock, SystemClock};
use crate::feedback::Feedback;
use crate::input::{KeyAction, KeyInput};
use crate::matcher::{character_states, judge_at, CharStatus, TargetText};
use crate::metrics::{compute, SessionMetrics};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Ready,
    Active,
    Paused,
    Completed,
}

/// Emitted exactly once, at the instant the last character is judged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: u32,
    pub gross_wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
    /// Every mistyped keystroke, including ones later erased
    pub error_count: u32,
    /// Positions still marked incorrect when the session completed
    pub uncorrected_errors: u32,
    pub correct_count: u32,
    pub total_typed_count: u32,
    pub elapsed_seconds: u64,
    pub completed_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingProgress {
    pub cursor: usize,
    pub total_characters: usize,
    pub correct_characters: u32,
    pub error_count: u32,
    pub metrics: SessionMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    Judged { position: usize, correct: bool },
    Reverted { position: usize },
    Paused,
    Resumed,
    Completed(SessionResult),
}

impl SessionEvent {
    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            SessionEvent::Judged { correct: true, .. } => Some(Feedback::Correct),
            SessionEvent::Judged { correct: false, .. } => Some(Feedback::Error),
            SessionEvent::Completed(_) => Some(Feedback::Complete),
            _ => None,
        }
    }
}

/// Lesson lifecycle: ready -> active <-> paused, active -> completed.
///
/// Typed and correct counters are never decremented by backspace, so erased
/// mistakes still count against accuracy. The cursor and error set are
/// restored exactly.
#[derive(Debug)]
pub struct TypingSession {
    target: TargetText,
    clock: SharedClock,
    state: SessionState,
    cursor: usize,
    errors: BTreeSet<usize>,
    correct_count: u32,
    total_typed_count: u32,
    started_at: Option<u64>,
    paused_at: Option<u64>,
    paused_ms: u64,
    completed_at: Option<u64>,
    result: Option<SessionResult>,
}

impl TypingSession {
    pub fn new(target: impl Into<TargetText>, clock: SharedClock) -> Self {
        Self {
            target: target.into(),
            clock,
            state: SessionState::Ready,
            cursor: 0,
            errors: BTreeSet::new(),
            correct_count: 0,
            total_typed_count: 0,
            started_at: None,
            paused_at: None,
            paused_ms: 0,
            completed_at: None,
            result: None,
        }
    }

    pub fn with_system_clock(target: impl Into<TargetText>) -> Self {
        Self::new(target, SystemClock::shared())
    }

    pub fn target(&self) -> &TargetText {
        &self.target
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error_set(&self) -> &BTreeSet<usize> {
        &self.errors
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn total_typed_count(&self) -> u32 {
        self.total_typed_count
    }

    pub fn error_count(&self) -> u32 {
        self.total_typed_count - self.correct_count
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn expected_char(&self) -> Option<char> {
        self.target.char_at(self.cursor)
    }

    pub fn character_states(&self) -> Vec<CharStatus> {
        character_states(&self.target, self.cursor, &self.errors, self.is_complete())
    }

    /// Milliseconds spent active, excluding paused intervals
    pub fn elapsed_ms(&self) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let end = self
            .completed_at
            .or(self.paused_at)
            .unwrap_or_else(|| self.clock.now_ms());
        end.saturating_sub(started).saturating_sub(self.paused_ms)
    }

    pub fn metrics(&self) -> SessionMetrics {
        compute(
            self.correct_count,
            self.total_typed_count,
            self.error_count(),
            self.elapsed_ms() as f64 / 1000.0,
        )
    }

    pub fn progress(&self) -> TypingProgress {
        TypingProgress {
            cursor: self.cursor,
            total_characters: self.target.len(),
            correct_characters: self.correct_count,
            error_count: self.error_count(),
            metrics: self.metrics(),
        }
    }

    /// Explicit start. Only valid from `Ready`.
    pub fn start(&mut self) -> Option<SessionEvent> {
        if self.state != SessionState::Ready {
            return None;
        }
        self.state = SessionState::Active;
        self.started_at = Some(self.clock.now_ms());
        debug!(length = self.target.len(), "typing session started");
        Some(SessionEvent::Started)
    }

    pub fn pause(&mut self) -> Option<SessionEvent> {
        if self.state != SessionState::Active {
            return None;
        }
        self.state = SessionState::Paused;
        self.paused_at = Some(self.clock.now_ms());
        Some(SessionEvent::Paused)
    }

    pub fn resume(&mut self) -> Option<SessionEvent> {
        if self.state != SessionState::Paused {
            return None;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_ms += self.clock.now_ms().saturating_sub(paused_at);
        }
        self.state = SessionState::Active;
        Some(SessionEvent::Resumed)
    }

    /// Back to `Ready` on the same target
    pub fn restart(&mut self) {
        self.state = SessionState::Ready;
        self.cursor = 0;
        self.errors.clear();
        self.correct_count = 0;
        self.total_typed_count = 0;
        self.started_at = None;
        self.paused_at = None;
        self.paused_ms = 0;
        self.completed_at = None;
        self.result = None;
    }

    /// Back to `Ready` on a new unit
    pub fn restart_with(&mut self, target: impl Into<TargetText>) {
        self.target = target.into();
        self.restart();
    }

    /// Feeds one raw key press. Keys arriving while paused or completed are
    /// dropped without touching any state.
    pub fn keystroke(&mut self, key: &KeyInput) -> Vec<SessionEvent> {
        if matches!(self.state, SessionState::Paused | SessionState::Completed) {
            return Vec::new();
        }

        match key.action() {
            KeyAction::Ignored => Vec::new(),
            KeyAction::Backspace => self.backspace().into_iter().collect(),
            KeyAction::Char(c) => self.type_char(c),
        }
    }

    fn backspace(&mut self) -> Option<SessionEvent> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.errors.remove(&self.cursor);
        Some(SessionEvent::Reverted {
            position: self.cursor,
        })
    }

    fn type_char(&mut self, c: char) -> Vec<SessionEvent> {
        let position = self.cursor;
        let Some(correct) = judge_at(&self.target, position, c) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        events.extend(self.start());

        if !correct {
            self.errors.insert(position);
        }
        self.cursor += 1;
        self.total_typed_count += 1;
        if correct {
            self.correct_count += 1;
        }
        events.push(SessionEvent::Judged { position, correct });

        if self.cursor == self.target.len() {
            events.push(SessionEvent::Completed(self.complete()));
        }
        events
    }

    fn complete(&mut self) -> SessionResult {
        self.completed_at = Some(self.clock.now_ms());
        self.state = SessionState::Completed;

        let metrics = self.metrics();
        let result = SessionResult {
            wpm: metrics.wpm,
            gross_wpm: metrics.gross_wpm,
            cpm: metrics.cpm,
            accuracy: metrics.accuracy,
            error_count: metrics.errors,
            uncorrected_errors: self.errors.len() as u32,
            correct_count: self.correct_count,
            total_typed_count: self.total_typed_count,
            elapsed_seconds: metrics.elapsed_seconds,
            completed_at: Local::now(),
        };
        info!(
            wpm = result.wpm,
            accuracy = result.accuracy,
            errors = result.error_count,
            "typing session completed"
        );
        self.result = Some(result.clone());
        result
    }
}
