use super::directions::{direction_vector, word_pool};
use super::typed::{BufferOutcome, MismatchPolicy, TypedBuffer};
use super::{GameEvent, GameKind, RoundCore, RoundDetail, RoundOutcome, RoundSettings, Simulation};
use crate::config::Difficulty;
use crate::input::KeyInput;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GRID_SIZE: i32 = 12;
pub const START: Position = Position { x: 1, y: 1 };
pub const GOAL: Position = Position {
    x: GRID_SIZE - 2,
    y: GRID_SIZE - 2,
};
pub const COLLECTIBLE_COUNT: usize = 5;
pub const ROUND_SECS: u32 = 120;
pub const COLLECTIBLE_POINTS: u32 = 50;
pub const GOAL_BONUS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Applies a movement vector, clamped to the grid
    pub fn step(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: (self.x + dx).clamp(0, GRID_SIZE - 1),
            y: (self.y + dy).clamp(0, GRID_SIZE - 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ObstacleKind {
    Wall,
    Pit,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub id: u32,
    pub position: Position,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collectible {
    pub id: u32,
    pub position: Position,
    pub collected: bool,
}

/// Obstacles and collectibles for one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
}

impl GridLayout {
    /// `15 + 2 * level` obstacle placements, skipping the start and goal
    /// cells, then collectibles on free cells. The goal is not guaranteed to
    /// be reachable.
    pub fn generate<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Self {
        let mut layout = Self::default();
        let placements = 15 + 2 * u32::from(level);
        for id in 0..placements {
            let position = random_cell(rng);
            if position == START || position == GOAL {
                continue;
            }
            let kind = if rng.gen_bool(0.7) {
                ObstacleKind::Wall
            } else if rng.gen_bool(0.8) {
                ObstacleKind::Pit
            } else {
                ObstacleKind::Enemy
            };
            layout.obstacles.push(Obstacle { id, position, kind });
        }

        let mut id = 0;
        while layout.collectibles.len() < COLLECTIBLE_COUNT {
            let position = random_cell(rng);
            if position == START
                || position == GOAL
                || layout.obstacle_at(position).is_some()
                || layout.collectibles.iter().any(|c| c.position == position)
            {
                continue;
            }
            layout.collectibles.push(Collectible {
                id,
                position,
                collected: false,
            });
            id += 1;
        }
        layout
    }

    pub fn obstacle_at(&self, position: Position) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.position == position)
    }

    pub fn collectible_at(&self, position: Position) -> Option<&Collectible> {
        self.collectibles.iter().find(|c| c.position == position)
    }

    pub fn collected(&self) -> u32 {
        self.collectibles.iter().filter(|c| c.collected).count() as u32
    }
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE))
}

/// Type direction words to walk from the start cell to the goal.
#[derive(Debug, Clone)]
pub struct GridNavigation {
    core: RoundCore,
    rng: StdRng,
    fixed_layout: Option<GridLayout>,
    layout: GridLayout,
    player: Position,
    word: String,
    buffer: TypedBuffer,
    words_typed: u32,
}

impl GridNavigation {
    pub fn new(settings: RoundSettings) -> Self {
        Self::build(settings, None)
    }

    /// Every round uses `layout` instead of a random one
    pub fn with_layout(settings: RoundSettings, layout: GridLayout) -> Self {
        Self::build(settings, Some(layout))
    }

    fn build(settings: RoundSettings, fixed_layout: Option<GridLayout>) -> Self {
        Self {
            core: RoundCore::new(GameKind::Path, settings, ROUND_SECS),
            rng: settings.rng(),
            layout: fixed_layout.clone().unwrap_or_default(),
            fixed_layout,
            player: START,
            word: String::new(),
            buffer: TypedBuffer::new(MismatchPolicy::Reset),
            words_typed: 0,
        }
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn words_typed(&self) -> u32 {
        self.words_typed
    }

    /// Words per minute over the time played, at least one second
    pub fn wpm(&self) -> u32 {
        let elapsed = self.core.elapsed_seconds().max(1);
        (f64::from(self.words_typed) * 60.0 / elapsed as f64).round() as u32
    }

    fn next_word(&mut self) -> GameEvent {
        let pool = word_pool(self.core.settings().difficulty, self.core.settings().language);
        self.word = pool.choose(&mut self.rng).copied().unwrap_or_default().to_string();
        self.buffer.clear();
        GameEvent::NewTarget(self.word.clone())
    }

    fn detail(&self) -> RoundDetail {
        RoundDetail::Path {
            words_typed: self.words_typed,
            wpm: self.wpm(),
            collectibles: self.layout.collected(),
            position: self.player,
        }
    }

    /// Clamp, then obstacle, then collectible, then goal
    fn walk(&mut self, vector: (i32, i32)) -> Vec<GameEvent> {
        let destination = self.player.step(vector);
        if let Some(obstacle) = self.layout.obstacle_at(destination) {
            debug!(?destination, kind = %obstacle.kind, "blocked");
            return vec![GameEvent::Blocked {
                at: destination,
                kind: obstacle.kind,
            }];
        }

        self.player = destination;
        let mut events = vec![GameEvent::Moved { to: destination }];

        if let Some(collectible) = self
            .layout
            .collectibles
            .iter_mut()
            .find(|c| c.position == destination && !c.collected)
        {
            collectible.collected = true;
            let id = collectible.id;
            self.core.add_score(COLLECTIBLE_POINTS);
            events.push(GameEvent::Collected {
                id,
                points: COLLECTIBLE_POINTS,
            });
        }

        if destination == GOAL {
            let bonus = GOAL_BONUS + self.core.time_left() * 2;
            self.core.add_score(bonus);
            let detail = self.detail();
            events.extend(self.core.finish(RoundOutcome::Won, detail));
        }
        events
    }
}

impl Simulation for GridNavigation {
    fn core(&self) -> &RoundCore {
        &self.core
    }

    fn start(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        let mut rng = self.rng.clone();
        let level = self.core.settings().level;
        let layout = match &self.fixed_layout {
            Some(layout) => layout.clone(),
            None => GridLayout::generate(level, &mut rng),
        };
        *self = Self {
            core: self.core.restarted(difficulty),
            rng,
            fixed_layout: self.fixed_layout.clone(),
            layout,
            player: START,
            word: String::new(),
            buffer: TypedBuffer::new(MismatchPolicy::Reset),
            words_typed: 0,
        };
        let target = self.next_word();
        vec![GameEvent::Started, target]
    }

    fn on_key(&mut self, key: &KeyInput) -> Vec<GameEvent> {
        if !self.core.is_playing() {
            return Vec::new();
        }
        let outcome = self.buffer.feed(key, &self.word);
        let mut events = Vec::new();
        if let Some(correct) = outcome.judged() {
            self.core.judge(correct);
            events.push(GameEvent::KeyJudged { correct });
        }
        if outcome == BufferOutcome::Complete {
            let word = self.word.clone();
            events.extend(self.on_unit_complete(&word));
        }
        events
    }

    fn on_unit_complete(&mut self, unit: &str) -> Vec<GameEvent> {
        if !self.core.is_playing() {
            return Vec::new();
        }
        let mut events = match direction_vector(unit) {
            Some(vector) => {
                self.words_typed += 1;
                self.walk(vector)
            }
            None => vec![GameEvent::UnknownWord(unit.to_string())],
        };
        if self.core.is_playing() {
            events.push(self.next_word());
        } else {
            self.buffer.clear();
        }
        events
    }

    fn tick(&mut self, delta_seconds: f64) -> Vec<GameEvent> {
        if self.core.tick_countdown(delta_seconds) {
            let detail = self.detail();
            return self.core.finish(RoundOutcome::Finished, detail).into_iter().collect();
        }
        Vec::new()
    }

    fn target(&self) -> Option<&str> {
        Some(self.word.as_str())
    }

    fn typed(&self) -> &str {
        self.buffer.as_str()
    }
}
