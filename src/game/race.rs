use super::typed::{BufferOutcome, MismatchPolicy, TypedBuffer};
use super::{GameEvent, GameKind, RoundCore, RoundDetail, RoundOutcome, RoundSettings, Simulation};
use crate::config::Difficulty;
use crate::content::SentencePool;
use crate::input::KeyInput;
use rand::rngs::StdRng;

pub const ROUND_SECS: u32 = 180;

pub fn sentence_points(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 50,
        Difficulty::Medium => 100,
        Difficulty::Hard => 150,
    }
}

/// Type whole sentences verbatim against the clock.
///
/// A wrong character is kept in the buffer until the player erases it.
#[derive(Debug, Clone)]
pub struct SentenceRace {
    core: RoundCore,
    rng: StdRng,
    pool: SentencePool,
    current: String,
    buffer: TypedBuffer,
    sentences: u32,
}

impl SentenceRace {
    pub fn new(settings: RoundSettings, pool: SentencePool) -> Self {
        Self {
            core: RoundCore::new(GameKind::Race, settings, ROUND_SECS),
            rng: settings.rng(),
            pool,
            current: String::new(),
            buffer: TypedBuffer::new(MismatchPolicy::Keep),
            sentences: 0,
        }
    }

    pub fn sentences(&self) -> u32 {
        self.sentences
    }

    fn next_sentence(&mut self) -> GameEvent {
        self.current = self
            .pool
            .pick(self.core.settings().difficulty, &mut self.rng)
            .unwrap_or_default()
            .to_string();
        self.buffer.clear();
        GameEvent::NewTarget(self.current.clone())
    }
}

impl Simulation for SentenceRace {
    fn core(&self) -> &RoundCore {
        &self.core
    }

    fn start(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        *self = Self {
            core: self.core.restarted(difficulty),
            rng: self.rng.clone(),
            pool: self.pool.clone(),
            current: String::new(),
            buffer: TypedBuffer::new(MismatchPolicy::Keep),
            sentences: 0,
        };
        let target = self.next_sentence();
        vec![GameEvent::Started, target]
    }

    fn on_key(&mut self, key: &KeyInput) -> Vec<GameEvent> {
        if !self.core.is_playing() {
            return Vec::new();
        }
        let outcome = self.buffer.feed(key, &self.current);
        let mut events = Vec::new();
        if let Some(correct) = outcome.judged() {
            self.core.judge(correct);
            events.push(GameEvent::KeyJudged { correct });
        }
        if outcome == BufferOutcome::Complete {
            let typed = self.buffer.as_str().to_string();
            events.extend(self.on_unit_complete(&typed));
        }
        events
    }

    /// Only a verbatim match of the current sentence counts
    fn on_unit_complete(&mut self, unit: &str) -> Vec<GameEvent> {
        if !self.core.is_playing() || unit != self.current {
            return Vec::new();
        }
        let points = sentence_points(self.core.settings().difficulty);
        self.core.add_score(points);
        self.sentences += 1;
        vec![GameEvent::SentenceCompleted { points }, self.next_sentence()]
    }

    fn tick(&mut self, delta_seconds: f64) -> Vec<GameEvent> {
        if self.core.tick_countdown(delta_seconds) {
            let detail = RoundDetail::Race {
                sentences: self.sentences,
            };
            self.buffer.clear();
            return self
                .core
                .finish(RoundOutcome::Finished, detail)
                .into_iter()
                .collect();
        }
        Vec::new()
    }

    fn target(&self) -> Option<&str> {
        Some(self.current.as_str())
    }

    fn typed(&self) -> &str {
        self.buffer.as_str()
    }
}
