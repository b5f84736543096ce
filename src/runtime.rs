use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::input::KeyInput;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum KetikEvent {
    Key(KeyInput),
    Resize,
    Tick,
}

impl From<KeyEvent> for KetikEvent {
    fn from(key: KeyEvent) -> Self {
        KetikEvent::Key(KeyInput::from(key))
    }
}

/// Source of host events (keys, resize)
pub trait KetikEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<KetikEvent, RecvTimeoutError>;
}

/// Terminal event source reading crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<KetikEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // key releases would double every keystroke on some terminals
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => tx.send(key.into()),
                Ok(CtEvent::Resize(_, _)) => tx.send(KetikEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KetikEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<KetikEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for headless runs and tests
pub struct ChannelEventSource {
    rx: Receiver<KetikEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<KetikEvent>) -> Self {
        Self { rx }
    }

    /// A source plus the sender that feeds it
    pub fn pair() -> (Sender<KetikEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl KetikEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<KetikEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Advances the application one event or tick at a time
pub struct Runner<E: KetikEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last_step: Instant,
}

impl<E: KetikEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last_step: Instant::now(),
        }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> KetikEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => KetikEvent::Tick,
        }
    }

    /// Wall time since the previous call, for driving game clocks
    pub fn delta_seconds(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_step).as_secs_f64();
        self.last_step = now;
        delta
    }
}
