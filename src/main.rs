pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ketik::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, Difficulty, FileConfigStore, WordLanguage},
    content::{LessonContent, LessonLibrary},
    error::KetikError,
    feedback::{FeedbackLog, FeedbackSink},
    game::{GameEvent, GameKind, GameSimulation, RoundSettings, Simulation},
    history::{HistoryDb, MemorySink, PerformanceSummary, ResultSink, SessionRecord},
    input::KeyInput,
    progression::{self, FileProgressStore, LessonId, ProgressRecord, ProgressStore, LEVEL_COUNT, SUBLEVELS_PER_LEVEL},
    runtime::{CrosstermEventSource, FixedTicker, KetikEvent, Runner},
    session::{SessionEvent, SessionResult, TypingSession},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin, Write},
    sync::Mutex,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 50;

/// terminal typing tutor with graded lessons and typing games
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing tutor: a 5-level lesson course with live WPM and accuracy, plus three timed typing games (falling letters, grid path, sentence race)."
)]
pub struct Cli {
    /// game difficulty, overrides the saved config
    #[clap(short, long, value_enum, global = true)]
    difficulty: Option<Difficulty>,

    /// language for instructions and game words
    #[clap(short, long, value_enum, global = true)]
    language: Option<WordLanguage>,

    /// seed for reproducible game rounds
    #[clap(long, global = true)]
    seed: Option<u64>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// practise a lesson, by default the next one in your progress
    Lesson {
        #[clap(long)]
        level: Option<u8>,
        #[clap(long)]
        sublevel: Option<u8>,
    },
    /// play a typing game
    Game {
        #[clap(value_enum)]
        kind: GameKind,
    },
    /// list the lessons of a level
    Lessons {
        #[clap(long, default_value_t = 1)]
        level: u8,
    },
    /// show course progress
    Progress {
        /// start the course over
        #[clap(long)]
        reset: bool,
    },
    /// show recent sessions and aggregate statistics
    Stats {
        #[clap(short = 'n', long, default_value_t = 10)]
        recent: usize,
    },
}

impl Cli {
    /// Saved config with command line overrides applied
    fn resolve(&self, saved: Config) -> Config {
        Config {
            difficulty: self.difficulty.unwrap_or(saved.difficulty),
            word_language: self.language.unwrap_or(saved.word_language),
            seed: self.seed.or(saved.seed),
            ..saved
        }
    }
}

pub struct LessonRun {
    pub lesson: LessonContent,
    pub session: TypingSession,
}

impl LessonRun {
    pub fn new(lesson: &LessonContent) -> Self {
        Self {
            lesson: lesson.clone(),
            session: TypingSession::with_system_clock(lesson.text.as_str()),
        }
    }

    pub fn id(&self) -> LessonId {
        LessonId::new(self.lesson.level, self.lesson.sublevel)
    }
}

pub enum Activity {
    Lesson(LessonRun),
    Game(GameSimulation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub activity: Activity,
    pub config: Config,
    pub progress: ProgressRecord,
    pub feedback: FeedbackLog,
    pub notice: Option<String>,
    library: LessonLibrary,
    sink: Box<dyn ResultSink>,
    progress_store: Box<dyn ProgressStore>,
}

impl App {
    pub fn new(
        activity: Activity,
        config: Config,
        library: LessonLibrary,
        sink: Box<dyn ResultSink>,
        progress_store: Box<dyn ProgressStore>,
    ) -> Self {
        let mut app = Self {
            activity,
            config,
            progress: progress_store.load(),
            feedback: FeedbackLog::default(),
            notice: None,
            library,
            sink,
            progress_store,
        };
        if let Activity::Game(game) = &mut app.activity {
            let events = game.start(app.config.difficulty);
            app.on_game_events(events);
        }
        app
    }

    pub fn round_settings(config: &Config) -> RoundSettings {
        RoundSettings {
            difficulty: config.difficulty,
            language: config.word_language,
            level: 1,
            seed: config.seed,
        }
    }

    pub fn handle_key(&mut self, key: &KeyInput) -> Control {
        match key.key.as_str() {
            "Esc" => return Control::Quit,
            "c" if key.modifiers.ctrl => return Control::Quit,
            "Tab" => {
                self.restart();
                return Control::Continue;
            }
            _ => {}
        }

        let lesson_done = matches!(&self.activity, Activity::Lesson(run) if run.session.is_complete());
        if lesson_done {
            if key.key == "Enter" {
                self.advance_lesson();
            }
            return Control::Continue;
        }

        match &mut self.activity {
            Activity::Lesson(run) => {
                let events = run.session.keystroke(key);
                let lesson = run.lesson.clone();
                self.on_session_events(&lesson, events);
            }
            Activity::Game(game) => {
                let events = game.on_key(key);
                self.on_game_events(events);
            }
        }
        Control::Continue
    }

    pub fn on_tick(&mut self, delta_seconds: f64) {
        if let Activity::Game(game) = &mut self.activity {
            let events = game.tick(delta_seconds);
            self.on_game_events(events);
        }
    }

    pub fn restart(&mut self) {
        self.feedback.clear();
        self.notice = None;
        match &mut self.activity {
            Activity::Lesson(run) => run.session.restart(),
            Activity::Game(game) => {
                let events = game.start(self.config.difficulty);
                self.on_game_events(events);
            }
        }
    }

    fn advance_lesson(&mut self) {
        let next = self.progress.current();
        match self.library.lesson(next.level, next.sublevel) {
            Some(lesson) => {
                self.activity = Activity::Lesson(LessonRun::new(lesson));
                self.feedback.clear();
                self.notice = None;
            }
            None => {
                self.notice = Some(format!(
                    "lesson {}-{} is not available yet",
                    next.level, next.sublevel
                ));
            }
        }
    }

    fn on_session_events(&mut self, lesson: &LessonContent, events: Vec<SessionEvent>) {
        for event in events {
            self.feedback.notify_all(event.feedback());
            if let SessionEvent::Completed(result) = event {
                self.complete_lesson(lesson, &result);
            }
        }
    }

    fn complete_lesson(&mut self, lesson: &LessonContent, result: &SessionResult) {
        let id = LessonId::new(lesson.level, lesson.sublevel);
        self.record(SessionRecord::from_lesson(id, result));

        if lesson.targets_met(result) {
            self.progress = progression::apply(&self.progress, id);
            if let Err(e) = self.progress_store.save(&self.progress) {
                warn!("could not save progress: {e}");
            }
            info!(level = id.level, sublevel = id.sublevel, "lesson passed");
            self.notice = Some("targets met! (enter) next lesson".to_string());
        } else {
            self.notice = Some(format!(
                "aim for {} wpm at {}% accuracy, (tab) to retry",
                lesson.target_wpm, lesson.min_accuracy
            ));
        }
    }

    fn on_game_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            self.feedback.notify_all(event.feedback());
            if let GameEvent::RoundOver(result) = event {
                self.record(SessionRecord::from_round(&result));
                self.notice = Some("(tab) play again / (esc) quit".to_string());
            }
        }
    }

    fn record(&mut self, record: SessionRecord) {
        if let Err(e) = self.sink.record(&record) {
            warn!("could not record session: {e}");
        }
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ketik=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn open_sink() -> Box<dyn ResultSink> {
    match HistoryDb::new() {
        Ok(db) => Box::new(db),
        Err(e) => {
            warn!("history unavailable, results kept in memory: {e}");
            Box::new(MemorySink::default())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.resolve(FileConfigStore::new().load());
    let library = LessonLibrary::embedded()?;
    let progress_store = FileProgressStore::new();
    let mut stdout = io::stdout().lock();

    let command = cli.command.clone().unwrap_or(Command::Lesson {
        level: None,
        sublevel: None,
    });

    match command {
        Command::Lessons { level } => {
            print_lessons(&mut stdout, &library, &progress_store.load(), level, config.word_language)?;
        }
        Command::Progress { reset } => {
            let mut record = progress_store.load();
            if reset {
                record.reset();
                progress_store.save(&record)?;
            }
            print_progress(&mut stdout, &record, config.word_language)?;
        }
        Command::Stats { recent } => {
            let db = HistoryDb::new()?;
            print_stats(&mut stdout, &db.summary()?, &db.recent(recent)?)?;
        }
        Command::Lesson { level, sublevel } => {
            let record = progress_store.load();
            let id = match level {
                Some(level) => LessonId::new(level, sublevel.unwrap_or(1)),
                None => record.current(),
            };
            let lesson = match library.require_lesson(id.level, id.sublevel) {
                Ok(lesson) => lesson.clone(),
                Err(e) => Cli::command().error(ErrorKind::InvalidValue, e).exit(),
            };
            if !record.is_unlocked(id.level) {
                let msg = format!("level {} is locked; finish level {} first", id.level, id.level - 1);
                Cli::command().error(ErrorKind::InvalidValue, msg).exit();
            }
            drop(stdout);
            let activity = Activity::Lesson(LessonRun::new(&lesson));
            let mut app = App::new(activity, config, library, open_sink(), Box::new(progress_store));
            run_tui(&mut app)?;
        }
        Command::Game { kind } => {
            drop(stdout);
            let game = GameSimulation::new(kind, App::round_settings(&config))?;
            let mut app = App::new(
                Activity::Game(game),
                config,
                library,
                open_sink(),
                Box::new(progress_store),
            );
            run_tui(&mut app)?;
        }
    }

    Ok(())
}

fn run_tui(app: &mut App) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        app.on_tick(runner.delta_seconds());
        if let KetikEvent::Key(key) = event {
            if app.handle_key(&key) == Control::Quit {
                break;
            }
        }
    }

    Ok(())
}

fn print_lessons<W: Write>(
    out: &mut W,
    library: &LessonLibrary,
    progress: &ProgressRecord,
    level: u8,
    language: WordLanguage,
) -> Result<(), KetikError> {
    let info = LessonLibrary::require_level_info(level)?;
    let lock = if progress.is_unlocked(level) { "" } else { " (locked)" };
    writeln!(
        out,
        "Level {level}: {} - {}{lock}",
        info.name(language),
        info.description(language)
    )?;

    for lesson in library.level_lessons(level) {
        let done = progress.is_completed(LessonId::new(lesson.level, lesson.sublevel));
        writeln!(
            out,
            "[{}] {:>2}. {:<28} {:>3} wpm {:>3}%  keys: {}",
            if done { "x" } else { " " },
            lesson.sublevel,
            lesson.title,
            lesson.target_wpm,
            lesson.min_accuracy,
            lesson.focus_keys.join(" ")
        )?;
    }
    Ok(())
}

fn print_progress<W: Write>(
    out: &mut W,
    progress: &ProgressRecord,
    language: WordLanguage,
) -> Result<(), KetikError> {
    writeln!(out, "Overall progress: {}%", progress.total_progress)?;
    writeln!(
        out,
        "Next lesson: {}-{}",
        progress.level, progress.sublevel
    )?;
    for level in 1..=LEVEL_COUNT {
        let name = LessonLibrary::level_info(level)
            .map(|info| info.name(language))
            .unwrap_or_default();
        writeln!(
            out,
            "Level {level} {:<26} {:>2}/{SUBLEVELS_PER_LEVEL} {}",
            name,
            progress.completed_in_level(level),
            if progress.is_unlocked(level) { "unlocked" } else { "locked" }
        )?;
    }
    Ok(())
}

fn print_stats<W: Write>(
    out: &mut W,
    summary: &PerformanceSummary,
    recent: &[SessionRecord],
) -> Result<(), KetikError> {
    writeln!(out, "Lessons completed: {}", summary.total_sessions)?;
    writeln!(
        out,
        "Best: {} wpm, {}% acc   Average: {} wpm, {}% acc",
        summary.best_wpm, summary.best_accuracy, summary.average_wpm, summary.average_accuracy
    )?;
    writeln!(
        out,
        "Games played: {}   Best score: {}",
        summary.games_played, summary.best_score
    )?;
    if recent.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    for record in recent {
        writeln!(
            out,
            "{}  {:<8} {:<24} {:>3} wpm {:>3}% {:>5} pts {:>4}s",
            record.recorded_at.format("%Y-%m-%d %H:%M"),
            record.mode,
            record.detail,
            record.wpm,
            record.accuracy,
            record.score,
            record.completion_time
        )?;
    }
    Ok(())
}
