use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::game::{RoundDetail, RoundResult};
use crate::progression::LessonId;
use crate::session::SessionResult;
use crate::util::rounded_mean;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionMode {
    Learning,
    Game,
}

impl SessionMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "learning" => Some(SessionMode::Learning),
            "game" => Some(SessionMode::Game),
            _ => None,
        }
    }
}

/// One finished lesson or game round
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub mode: SessionMode,
    /// Lesson id or game kind and difficulty, human readable
    pub detail: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub error_count: u32,
    pub score: u32,
    /// Seconds from first keystroke to completion
    pub completion_time: u64,
    pub recorded_at: DateTime<Local>,
}

impl SessionRecord {
    pub fn from_lesson(lesson: LessonId, result: &SessionResult) -> Self {
        Self {
            mode: SessionMode::Learning,
            detail: format!("lesson {}-{}", lesson.level, lesson.sublevel),
            wpm: result.wpm,
            accuracy: result.accuracy,
            error_count: result.error_count,
            score: 0,
            completion_time: result.elapsed_seconds,
            recorded_at: result.completed_at,
        }
    }

    pub fn from_round(result: &RoundResult) -> Self {
        let wpm = match result.detail {
            RoundDetail::Path { wpm, .. } => wpm,
            _ => 0,
        };
        Self {
            mode: SessionMode::Game,
            detail: format!("{} {} {}", result.kind, result.difficulty, result.outcome),
            wpm,
            accuracy: result.accuracy,
            error_count: result.errors,
            score: result.score,
            completion_time: result.elapsed_seconds,
            recorded_at: Local::now(),
        }
    }
}

/// Aggregates over completed lessons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerformanceSummary {
    pub total_sessions: usize,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub average_wpm: u32,
    pub average_accuracy: u32,
    pub games_played: usize,
    pub best_score: u32,
}

/// Lesson records drive the typing figures; game records only add to
/// `games_played` and `best_score`.
pub fn summarize<'a, I>(records: I) -> PerformanceSummary
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let (lessons, games): (Vec<&SessionRecord>, Vec<&SessionRecord>) = records
        .into_iter()
        .partition(|r| r.mode == SessionMode::Learning);

    PerformanceSummary {
        total_sessions: lessons.len(),
        best_wpm: lessons.iter().map(|r| r.wpm).max().unwrap_or(0),
        best_accuracy: lessons.iter().map(|r| r.accuracy).max().unwrap_or(0),
        average_wpm: rounded_mean(lessons.iter().map(|r| r.wpm)),
        average_accuracy: rounded_mean(lessons.iter().map(|r| r.accuracy)),
        games_played: games.len(),
        best_score: games.iter().map(|r| r.score).max().unwrap_or(0),
    }
}

/// Receives every completed session or round
pub trait ResultSink {
    fn record(&mut self, record: &SessionRecord) -> Result<()>;
}

/// Keeps records in memory, newest last
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub records: Vec<SessionRecord>,
}

impl MemorySink {
    pub fn summary(&self) -> PerformanceSummary {
        summarize(&self.records)
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, record: &SessionRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    mode TEXT NOT NULL,
    detail TEXT NOT NULL,
    wpm INTEGER NOT NULL,
    accuracy INTEGER NOT NULL,
    error_count INTEGER NOT NULL,
    score INTEGER NOT NULL,
    completion_time INTEGER NOT NULL,
    recorded_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_recorded_at ON sessions(recorded_at);
"#;

/// SQLite-backed session history
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Opens the database under the application state directory
    pub fn new() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("ketik_history.db"));
        Self::open_at(path)
    }

    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn insert(&self, record: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions
            (mode, detail, wpm, accuracy, error_count, score, completion_time, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.mode.to_string(),
                record.detail,
                record.wpm,
                record.accuracy,
                record.error_count,
                record.score,
                record.completion_time as i64,
                record.recorded_at.to_rfc3339(),
            ],
        )?;
        debug!(mode = %record.mode, detail = %record.detail, "session recorded");
        Ok(())
    }

    /// Up to `limit` records, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        self.query(i64::try_from(limit).unwrap_or(i64::MAX))
    }

    /// A negative limit returns every row
    fn query(&self, limit: i64) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT mode, detail, wpm, accuracy, error_count, score, completion_time, recorded_at
            FROM sessions
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([limit], |row| {
            let mode: String = row.get(0)?;
            let mode = SessionMode::parse(&mode).ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(0, "mode".to_string(), rusqlite::types::Type::Text)
            })?;
            let recorded_at: String = row.get(7)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(7, "recorded_at".to_string(), rusqlite::types::Type::Text)
                })?
                .with_timezone(&Local);
            let completion_time: i64 = row.get(6)?;

            Ok(SessionRecord {
                mode,
                detail: row.get(1)?,
                wpm: row.get(2)?,
                accuracy: row.get(3)?,
                error_count: row.get(4)?,
                score: row.get(5)?,
                completion_time: completion_time.max(0) as u64,
                recorded_at,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    pub fn summary(&self) -> Result<PerformanceSummary> {
        let records = self.query(-1)?;
        Ok(summarize(&records))
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}

impl ResultSink for HistoryDb {
    fn record(&mut self, record: &SessionRecord) -> Result<()> {
        self.insert(record)
    }
}
