//! Selection phase timer
//!
//! A single-shot countdown measured against an injected clock. The battle
//! polls it from `tick()`; nothing here sleeps or spawns threads.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since some fixed origin
    fn now(&self) -> Duration;
}

/// Wall-clock time
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-stepped time. Clones share the same reading, so a test can keep a
/// handle while the battle owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Result of polling the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPoll {
    /// Not armed
    Disarmed,
    /// Budget used up
    Expired,
    /// Still running, with whole seconds left
    Running { remaining_secs: u64 },
}

/// Cancellable single-shot countdown
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    budget: Duration,
    armed_at: Option<Duration>,
}

impl PhaseTimer {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            armed_at: None,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Start (or restart) the countdown from `now`
    pub fn arm(&mut self, now: Duration) {
        self.armed_at = Some(now);
    }

    /// Stop the countdown. Safe to call when not armed.
    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Time since arming, if armed
    pub fn elapsed(&self, now: Duration) -> Option<Duration> {
        self.armed_at.map(|start| now.saturating_sub(start))
    }

    /// Expires once elapsed time is strictly past the budget
    pub fn poll(&self, now: Duration) -> TimerPoll {
        let Some(elapsed) = self.elapsed(now) else {
            return TimerPoll::Disarmed;
        };
        if elapsed > self.budget {
            TimerPoll::Expired
        } else {
            TimerPoll::Running {
                remaining_secs: (self.budget - elapsed).as_secs(),
            }
        }
    }
}

/// Announces each remaining second at most once
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    announced: BTreeSet<u64>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a given second is seen
    pub fn announce(&mut self, secs: u64) -> bool {
        self.announced.insert(secs)
    }

    pub fn clear(&mut self) {
        self.announced.clear();
    }
}
