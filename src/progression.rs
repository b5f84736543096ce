use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const LEVEL_COUNT: u8 = 5;
pub const SUBLEVELS_PER_LEVEL: u8 = 20;
pub const TOTAL_SUBLEVELS: usize = LEVEL_COUNT as usize * SUBLEVELS_PER_LEVEL as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LessonId {
    pub level: u8,
    pub sublevel: u8,
}

impl LessonId {
    pub fn new(level: u8, sublevel: u8) -> Self {
        Self { level, sublevel }
    }

    pub fn is_valid(&self) -> bool {
        (1..=LEVEL_COUNT).contains(&self.level) && (1..=SUBLEVELS_PER_LEVEL).contains(&self.sublevel)
    }
}

/// Course progress. Only [`apply`] adds completions or unlocks levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub level: u8,
    pub sublevel: u8,
    pub completed_sublevels: BTreeSet<LessonId>,
    pub unlocked_levels: BTreeSet<u8>,
    pub total_progress: u8,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self {
            level: 1,
            sublevel: 1,
            completed_sublevels: BTreeSet::new(),
            unlocked_levels: BTreeSet::from([1]),
            total_progress: 0,
        }
    }

    pub fn current(&self) -> LessonId {
        LessonId::new(self.level, self.sublevel)
    }

    pub fn is_unlocked(&self, level: u8) -> bool {
        self.unlocked_levels.contains(&level)
    }

    pub fn is_completed(&self, lesson: LessonId) -> bool {
        self.completed_sublevels.contains(&lesson)
    }

    pub fn completed_in_level(&self, level: u8) -> usize {
        self.completed_sublevels
            .iter()
            .filter(|id| id.level == level)
            .count()
    }

    /// Percentage of one level's sublevels completed
    pub fn level_progress(&self, level: u8) -> u8 {
        (100.0 * self.completed_in_level(level) as f64 / SUBLEVELS_PER_LEVEL as f64).round() as u8
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn total_progress(completed: usize) -> u8 {
    (100.0 * completed as f64 / TOTAL_SUBLEVELS as f64)
        .round()
        .min(100.0) as u8
}

fn next_position(record: &ProgressRecord, completed: LessonId) -> LessonId {
    if completed.sublevel < SUBLEVELS_PER_LEVEL {
        LessonId::new(completed.level, completed.sublevel + 1)
    } else if record.is_unlocked(completed.level + 1) {
        LessonId::new(completed.level + 1, 1)
    } else {
        completed
    }
}

/// Marks a lesson complete and returns the updated record.
///
/// Re-completing a lesson returns the record unchanged. The current position
/// only ever moves forward. The next level unlocks once every sublevel of
/// this one is complete; unlocks are never revoked. Ids outside the course
/// are ignored.
pub fn apply(record: &ProgressRecord, completed: LessonId) -> ProgressRecord {
    let mut next = record.clone();
    if !completed.is_valid() {
        warn!(?completed, "ignoring completion outside the course");
        return next;
    }
    if !next.completed_sublevels.insert(completed) {
        return next;
    }
    next.total_progress = total_progress(next.completed_sublevels.len());

    let mut position = next_position(&next, completed).max(record.current());

    let level = completed.level;
    if level < LEVEL_COUNT
        && next.completed_in_level(level) == SUBLEVELS_PER_LEVEL as usize
        && next.unlocked_levels.insert(level + 1)
    {
        info!(level = level + 1, "level unlocked");
        position = position.max(LessonId::new(level + 1, 1));
    }

    next.level = position.level;
    next.sublevel = position.sublevel;
    next
}

pub trait ProgressStore {
    fn load(&self) -> ProgressRecord;
    fn save(&self, record: &ProgressRecord) -> Result<()>;
}

/// JSON file next to the history database
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = crate::app_dirs::AppDirs::progress_path()
            .unwrap_or_else(|| PathBuf::from("ketik_progress.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> ProgressRecord {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    fn save(&self, record: &ProgressRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(record)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn complete_level(mut record: ProgressRecord, level: u8, upto: u8) -> ProgressRecord {
        for sub in 1..=upto {
            record = apply(&record, LessonId::new(level, sub));
        }
        record
    }

    #[test]
    fn new_record_unlocks_only_level_one() {
        let r = ProgressRecord::new();
        assert_eq!(r.current(), LessonId::new(1, 1));
        assert!(r.is_unlocked(1));
        assert!(!r.is_unlocked(2));
        assert_eq!(r.total_progress, 0);
    }

    #[test]
    fn completing_marks_and_advances() {
        let r = apply(&ProgressRecord::new(), LessonId::new(1, 1));
        assert!(r.is_completed(LessonId::new(1, 1)));
        assert_eq!(r.current(), LessonId::new(1, 2));
        assert_eq!(r.total_progress, 1);
    }

    #[test]
    fn apply_does_not_mutate_input() {
        let original = ProgressRecord::new();
        let _ = apply(&original, LessonId::new(1, 1));
        assert_eq!(original, ProgressRecord::new());
    }

    #[test]
    fn recompleting_is_idempotent() {
        let once = apply(&ProgressRecord::new(), LessonId::new(1, 3));
        let twice = apply(&once, LessonId::new(1, 3));
        assert_eq!(twice, once);
    }

    #[test]
    fn replaying_an_earlier_lesson_keeps_position() {
        let r = complete_level(ProgressRecord::new(), 1, 10);
        assert_eq!(r.current(), LessonId::new(1, 11));
        assert_eq!(apply(&r, LessonId::new(1, 3)), r);
    }

    #[test]
    fn position_never_moves_backwards() {
        let r = apply(&ProgressRecord::new(), LessonId::new(1, 12));
        assert_eq!(r.current(), LessonId::new(1, 13));
        let r = apply(&r, LessonId::new(1, 2));
        assert!(r.is_completed(LessonId::new(1, 2)));
        assert_eq!(r.current(), LessonId::new(1, 13));
    }

    #[test]
    fn late_unlock_moves_to_next_level() {
        let mut r = ProgressRecord::new();
        for sub in (1..=20).rev() {
            r = apply(&r, LessonId::new(1, sub));
        }
        assert_eq!(r.current(), LessonId::new(2, 1));
    }

    #[test]
    fn nineteen_sublevels_do_not_unlock() {
        let r = complete_level(ProgressRecord::new(), 1, 19);
        assert!(!r.is_unlocked(2));
        assert_eq!(r.completed_in_level(1), 19);
    }

    #[test]
    fn twentieth_sublevel_unlocks_next_level() {
        let r = complete_level(ProgressRecord::new(), 1, 20);
        assert!(r.is_unlocked(2));
        assert_eq!(r.total_progress, 20);
        assert_eq!(r.level_progress(1), 100);
        assert_eq!(r.current(), LessonId::new(2, 1));
    }

    #[test]
    fn completion_order_does_not_matter() {
        let mut r = ProgressRecord::new();
        for sub in (1..=20).rev() {
            r = apply(&r, LessonId::new(1, sub));
        }
        assert!(r.is_unlocked(2));
    }

    #[test]
    fn last_level_never_unlocks_a_sixth() {
        let mut r = ProgressRecord::new();
        for level in 1..=5 {
            r = complete_level(r, level, 20);
        }
        assert_eq!(r.unlocked_levels, BTreeSet::from([1, 2, 3, 4, 5]));
        assert_eq!(r.total_progress, 100);
        assert_eq!(r.current(), LessonId::new(5, 20));
    }

    #[test]
    fn unlocks_are_monotonic() {
        let r = complete_level(ProgressRecord::new(), 1, 20);
        let again = apply(&r, LessonId::new(1, 5));
        assert!(again.is_unlocked(2));
    }

    #[test]
    fn out_of_course_ids_are_ignored() {
        let base = ProgressRecord::new();
        for id in [
            LessonId::new(0, 1),
            LessonId::new(6, 1),
            LessonId::new(1, 0),
            LessonId::new(1, 21),
        ] {
            assert_eq!(apply(&base, id), base);
        }
    }

    #[test]
    fn reset_returns_to_start() {
        let mut r = complete_level(ProgressRecord::new(), 1, 20);
        r.reset();
        assert_eq!(r, ProgressRecord::new());
    }

    #[test]
    fn store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileProgressStore::with_path(dir.path().join("p").join("progress.json"));
        assert_eq!(store.load(), ProgressRecord::new());
        let r = complete_level(ProgressRecord::new(), 1, 20);
        store.save(&r).unwrap();
        assert_eq!(store.load(), r);
    }
}
