//! Logical clocks driven by `tick(delta_seconds)`.
//!
//! Time is accumulated in whole microseconds so repeated small deltas fire
//! exactly as often as one large delta of the same total.

const MICROS_PER_SEC: f64 = 1_000_000.0;

fn to_micros(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * MICROS_PER_SEC).round() as u64
    } else {
        0
    }
}

/// Fires once per elapsed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    interval_us: u64,
    elapsed_us: u64,
}

impl IntervalTimer {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval_us: to_micros(interval_secs).max(1),
            elapsed_us: 0,
        }
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_us as f64 / MICROS_PER_SEC
    }

    /// Number of times the interval elapsed during `delta_secs`
    pub fn advance(&mut self, delta_secs: f64) -> u32 {
        self.elapsed_us += to_micros(delta_secs);
        let fires = self.elapsed_us / self.interval_us;
        self.elapsed_us %= self.interval_us;
        fires as u32
    }

    pub fn reset(&mut self) {
        self.elapsed_us = 0;
    }
}

/// Whole-second countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    second: IntervalTimer,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            second: IntervalTimer::new(1.0),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Returns true only on the call that reaches zero
    pub fn advance(&mut self, delta_secs: f64) -> bool {
        if self.remaining == 0 {
            return false;
        }
        let seconds = self.second.advance(delta_secs);
        self.remaining = self.remaining.saturating_sub(seconds);
        self.remaining == 0
    }
}
