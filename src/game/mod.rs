//! Timed game rounds: falling capture, grid navigation and sentence race.
//!
//! Every round is driven by two inputs, keys and `tick(delta_seconds)`, and
//! reports what happened as a list of [`GameEvent`]s. A round ends exactly
//! once, either when its countdown expires or, for grid navigation, when the
//! goal is reached; the final event is always [`GameEvent::RoundOver`].

pub mod directions;
pub mod falling;
pub mod grid;
pub mod race;
pub mod timer;
pub mod typed;

pub use falling::{FallingCapture, FallingEntity};
pub use grid::{Collectible, GridLayout, GridNavigation, Obstacle, ObstacleKind, Position};
pub use race::SentenceRace;

use crate::config::{Difficulty, WordLanguage};
use crate::content::SentencePool;
use crate::error::Result;
use crate::feedback::Feedback;
use crate::input::KeyInput;
use crate::metrics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use timer::Countdown;
use tracing::info;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameKind {
    /// Falling letters
    Catch,
    /// Grid navigation by direction words
    Path,
    /// Sentence race
    Race,
}

/// Behaviour-affecting knobs, fixed for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    pub difficulty: Difficulty,
    pub language: WordLanguage,
    pub level: u8,
    pub seed: Option<u64>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl RoundSettings {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            language: WordLanguage::default(),
            level: 1,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_language(mut self, language: WordLanguage) -> Self {
        self.language = language;
        self
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RoundState {
    Ready,
    Playing,
    Finished,
    Won,
}

impl RoundState {
    pub fn is_over(&self) -> bool {
        matches!(self, RoundState::Finished | RoundState::Won)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoundOutcome {
    /// Time ran out
    Finished,
    /// Goal reached
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoundDetail {
    Catch {
        caught: u32,
        missed: u32,
        dropped: u32,
    },
    Path {
        words_typed: u32,
        wpm: u32,
        collectibles: u32,
        position: Position,
    },
    Race {
        sentences: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub kind: GameKind,
    pub difficulty: Difficulty,
    pub outcome: RoundOutcome,
    pub score: u32,
    pub accuracy: u32,
    /// Judged keystrokes that were wrong
    pub errors: u32,
    pub elapsed_seconds: u64,
    pub detail: RoundDetail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    /// A typed key was judged against the current word or sentence
    KeyJudged { correct: bool },
    Spawned { id: u64, glyph: char },
    Caught { id: u64, glyph: char, points: u32 },
    /// The key matched no falling entity
    Missed { glyph: char },
    /// An entity left the field
    Dropped { id: u64 },
    Moved { to: Position },
    Blocked { at: Position, kind: ObstacleKind },
    Collected { id: u32, points: u32 },
    UnknownWord(String),
    SentenceCompleted { points: u32 },
    NewTarget(String),
    RoundOver(RoundResult),
}

impl GameEvent {
    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            GameEvent::KeyJudged { correct: false }
            | GameEvent::Missed { .. }
            | GameEvent::Blocked { .. }
            | GameEvent::UnknownWord(_) => Some(Feedback::Error),
            GameEvent::Caught { .. }
            | GameEvent::Collected { .. }
            | GameEvent::SentenceCompleted { .. } => Some(Feedback::Correct),
            GameEvent::RoundOver(_) => Some(Feedback::Complete),
            _ => None,
        }
    }
}

/// Lifecycle, score, countdown and keystroke accuracy shared by every round
#[derive(Debug, Clone)]
pub struct RoundCore {
    kind: GameKind,
    settings: RoundSettings,
    duration_secs: u32,
    state: RoundState,
    score: u32,
    countdown: Countdown,
    correct_keys: u32,
    total_keys: u32,
    result: Option<RoundResult>,
}

impl RoundCore {
    pub fn new(kind: GameKind, settings: RoundSettings, duration_secs: u32) -> Self {
        Self {
            kind,
            settings,
            duration_secs,
            state: RoundState::Ready,
            score: 0,
            countdown: Countdown::new(duration_secs),
            correct_keys: 0,
            total_keys: 0,
            result: None,
        }
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == RoundState::Playing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        u64::from(self.duration_secs - self.countdown.remaining())
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    /// Fresh core for a new round at `difficulty`
    pub(crate) fn restarted(&self, difficulty: Difficulty) -> Self {
        let settings = RoundSettings {
            difficulty,
            ..self.settings
        };
        let mut core = Self::new(self.kind, settings, self.duration_secs);
        core.state = RoundState::Playing;
        info!(kind = %self.kind, %difficulty, "round started");
        core
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub(crate) fn judge(&mut self, correct: bool) {
        self.total_keys += 1;
        if correct {
            self.correct_keys += 1;
        }
    }

    pub fn accuracy(&self) -> u32 {
        metrics::compute(
            self.correct_keys,
            self.total_keys,
            self.total_keys - self.correct_keys,
            self.elapsed_seconds() as f64,
        )
        .accuracy
    }

    /// True on the tick that runs the clock out
    pub(crate) fn tick_countdown(&mut self, delta_seconds: f64) -> bool {
        self.is_playing() && self.countdown.advance(delta_seconds)
    }

    /// Ends the round. Only the first call produces a result.
    pub(crate) fn finish(&mut self, outcome: RoundOutcome, detail: RoundDetail) -> Option<GameEvent> {
        if self.state != RoundState::Playing {
            return None;
        }
        self.state = match outcome {
            RoundOutcome::Finished => RoundState::Finished,
            RoundOutcome::Won => RoundState::Won,
        };
        let result = RoundResult {
            kind: self.kind,
            difficulty: self.settings.difficulty,
            outcome,
            score: self.score,
            accuracy: self.accuracy(),
            errors: self.total_keys - self.correct_keys,
            elapsed_seconds: self.elapsed_seconds(),
            detail,
        };
        info!(
            kind = %result.kind,
            outcome = %result.outcome,
            score = result.score,
            accuracy = result.accuracy,
            "round over"
        );
        self.result = Some(result.clone());
        Some(GameEvent::RoundOver(result))
    }
}

/// Shared surface of the three game variants
pub trait Simulation {
    fn core(&self) -> &RoundCore;

    /// Discards the previous world and begins a new round
    fn start(&mut self, difficulty: Difficulty) -> Vec<GameEvent>;

    fn on_key(&mut self, key: &KeyInput) -> Vec<GameEvent>;

    /// A full unit (glyph, word or sentence) was typed
    fn on_unit_complete(&mut self, unit: &str) -> Vec<GameEvent>;

    fn tick(&mut self, delta_seconds: f64) -> Vec<GameEvent>;

    /// Word or sentence the player should type next, if the variant has one
    fn target(&self) -> Option<&str> {
        None
    }

    /// Typed-so-far text for the current target
    fn typed(&self) -> &str {
        ""
    }

    fn kind(&self) -> GameKind {
        self.core().kind
    }

    fn state(&self) -> RoundState {
        self.core().state()
    }

    fn score(&self) -> u32 {
        self.core().score()
    }

    fn time_left(&self) -> u32 {
        self.core().time_left()
    }

    fn result(&self) -> Option<&RoundResult> {
        self.core().result()
    }
}

/// One of the three variants, chosen at runtime
#[derive(Debug, Clone)]
pub enum GameSimulation {
    Catch(FallingCapture),
    Path(GridNavigation),
    Race(SentenceRace),
}

impl GameSimulation {
    pub fn new(kind: GameKind, settings: RoundSettings) -> Result<Self> {
        Ok(match kind {
            GameKind::Catch => GameSimulation::Catch(FallingCapture::new(settings)),
            GameKind::Path => GameSimulation::Path(GridNavigation::new(settings)),
            GameKind::Race => {
                GameSimulation::Race(SentenceRace::new(settings, SentencePool::embedded()?))
            }
        })
    }

    fn inner(&self) -> &dyn Simulation {
        match self {
            GameSimulation::Catch(g) => g,
            GameSimulation::Path(g) => g,
            GameSimulation::Race(g) => g,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Simulation {
        match self {
            GameSimulation::Catch(g) => g,
            GameSimulation::Path(g) => g,
            GameSimulation::Race(g) => g,
        }
    }
}

impl Simulation for GameSimulation {
    fn core(&self) -> &RoundCore {
        self.inner().core()
    }

    fn start(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        self.inner_mut().start(difficulty)
    }

    fn on_key(&mut self, key: &KeyInput) -> Vec<GameEvent> {
        self.inner_mut().on_key(key)
    }

    fn on_unit_complete(&mut self, unit: &str) -> Vec<GameEvent> {
        self.inner_mut().on_unit_complete(unit)
    }

    fn tick(&mut self, delta_seconds: f64) -> Vec<GameEvent> {
        self.inner_mut().tick(delta_seconds)
    }

    fn target(&self) -> Option<&str> {
        self.inner().target()
    }

    fn typed(&self) -> &str {
        self.inner().typed()
    }
}
