//! Time source for item timestamps.

use chrono::{Duration, Local, NaiveDateTime};
use std::cell::Cell;

/// Supplies the local wall-clock time used to stamp items.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Used by tests that need reproducible timestamps.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: Cell<NaiveDateTime>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: NaiveDateTime, step: Duration) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Time the next `now()` call will return.
    pub fn peek(&self) -> NaiveDateTime {
        self.next.get()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}
