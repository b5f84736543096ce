use super::timer::IntervalTimer;
use super::{GameEvent, GameKind, RoundCore, RoundDetail, RoundOutcome, RoundSettings, Simulation};
use crate::config::Difficulty;
use crate::input::{KeyAction, KeyInput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

pub const FIELD_WIDTH: i32 = 400;
pub const FIELD_HEIGHT: i32 = 400;
pub const ENTITY_SIZE: i32 = 40;
pub const SPAWN_Y: i32 = -40;
pub const FALL_STEP_SECS: f64 = 0.05;
pub const ROUND_SECS: u32 = 60;
pub const CATCH_POINTS: u32 = 10;

const EASY_GLYPHS: &str = "abcdefghij";
const MEDIUM_GLYPHS: &str = "abcdefghijklmnopqrstuvwxyz";
const HARD_GLYPHS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn alphabet(difficulty: Difficulty) -> Vec<char> {
    match difficulty {
        Difficulty::Easy => EASY_GLYPHS,
        Difficulty::Medium => MEDIUM_GLYPHS,
        Difficulty::Hard => HARD_GLYPHS,
    }
    .chars()
    .collect()
}

/// Units fallen per fixed step
fn fall_speed(difficulty: Difficulty) -> i32 {
    match difficulty {
        Difficulty::Easy => 1,
        Difficulty::Medium => 2,
        Difficulty::Hard => 3,
    }
}

fn spawn_interval(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 2.0,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingEntity {
    pub id: u64,
    pub glyph: char,
    pub x: i32,
    pub y: i32,
    pub fall_speed: i32,
}

/// Letters fall from the top; typing a letter catches the oldest copy of it.
#[derive(Debug, Clone)]
pub struct FallingCapture {
    core: RoundCore,
    rng: StdRng,
    entities: BTreeMap<u64, FallingEntity>,
    next_id: u64,
    spawn: IntervalTimer,
    fall: IntervalTimer,
    caught: u32,
    missed: u32,
    dropped: u32,
}

impl FallingCapture {
    pub fn new(settings: RoundSettings) -> Self {
        Self {
            core: RoundCore::new(GameKind::Catch, settings, ROUND_SECS),
            rng: settings.rng(),
            entities: BTreeMap::new(),
            next_id: 0,
            spawn: IntervalTimer::new(spawn_interval(settings.difficulty)),
            fall: IntervalTimer::new(FALL_STEP_SECS),
            caught: 0,
            missed: 0,
            dropped: 0,
        }
    }

    /// Live entities in spawn order
    pub fn entities(&self) -> impl Iterator<Item = &FallingEntity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn caught(&self) -> u32 {
        self.caught
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    /// Places an entity at the top of the field and returns its id
    pub fn spawn_entity(&mut self, glyph: char, x: i32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            FallingEntity {
                id,
                glyph,
                x: x.clamp(0, FIELD_WIDTH - ENTITY_SIZE),
                y: SPAWN_Y,
                fall_speed: fall_speed(self.core.settings().difficulty),
            },
        );
        id
    }

    fn spawn_random(&mut self) -> Option<GameEvent> {
        let glyph = *alphabet(self.core.settings().difficulty).choose(&mut self.rng)?;
        let x = self.rng.gen_range(0..FIELD_WIDTH - ENTITY_SIZE);
        let id = self.spawn_entity(glyph, x);
        debug!(id, %glyph, x, "spawned");
        Some(GameEvent::Spawned { id, glyph })
    }

    fn fall_step(&mut self, events: &mut Vec<GameEvent>) {
        for entity in self.entities.values_mut() {
            entity.y += entity.fall_speed;
        }
        let gone: Vec<u64> = self
            .entities
            .values()
            .filter(|e| e.y > FIELD_HEIGHT)
            .map(|e| e.id)
            .collect();
        for id in gone {
            self.entities.remove(&id);
            self.dropped += 1;
            events.push(GameEvent::Dropped { id });
        }
    }

    fn capture(&mut self, glyph: char) -> Vec<GameEvent> {
        let hit = self
            .entities
            .values()
            .find(|e| e.glyph == glyph)
            .map(|e| e.id);
        match hit {
            Some(id) => {
                self.entities.remove(&id);
                self.caught += 1;
                self.core.judge(true);
                self.core.add_score(CATCH_POINTS);
                vec![GameEvent::Caught {
                    id,
                    glyph,
                    points: CATCH_POINTS,
                }]
            }
            None => {
                self.missed += 1;
                self.core.judge(false);
                vec![GameEvent::Missed { glyph }]
            }
        }
    }

    fn detail(&self) -> RoundDetail {
        RoundDetail::Catch {
            caught: self.caught,
            missed: self.missed,
            dropped: self.dropped,
        }
    }
}

impl Simulation for FallingCapture {
    fn core(&self) -> &RoundCore {
        &self.core
    }

    fn start(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        *self = Self {
            core: self.core.restarted(difficulty),
            rng: self.rng.clone(),
            entities: BTreeMap::new(),
            next_id: 0,
            spawn: IntervalTimer::new(spawn_interval(difficulty)),
            fall: IntervalTimer::new(FALL_STEP_SECS),
            caught: 0,
            missed: 0,
            dropped: 0,
        };
        vec![GameEvent::Started]
    }

    fn on_key(&mut self, key: &KeyInput) -> Vec<GameEvent> {
        match key.action() {
            KeyAction::Char(c) if self.core.is_playing() => self.capture(c),
            _ => Vec::new(),
        }
    }

    fn on_unit_complete(&mut self, unit: &str) -> Vec<GameEvent> {
        let mut chars = unit.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if self.core.is_playing() => self.capture(c),
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, delta_seconds: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.core.is_playing() {
            return events;
        }
        for _ in 0..self.fall.advance(delta_seconds) {
            self.fall_step(&mut events);
        }
        for _ in 0..self.spawn.advance(delta_seconds) {
            events.extend(self.spawn_random());
        }
        if self.core.tick_countdown(delta_seconds) {
            self.entities.clear();
            let detail = self.detail();
            events.extend(self.core.finish(RoundOutcome::Finished, detail));
        }
        events
    }
}
