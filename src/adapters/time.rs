//! Time source adapters.
//!
//! - [`MonotonicClock`]: seconds since construction, backed by
//!   `std::time::Instant`.  Used by the demo binary.
//! - [`ManualClock`]: a clock the caller sets by hand, for tests and
//!   simulation where real time would make results flaky.

use std::cell::Cell;
use std::time::Instant;

use crate::app::ports::TimeSource;

/// Monotonic wall clock starting at zero.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_secs: f64) -> Self {
        Self {
            now: Cell::new(start_secs),
        }
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl TimeSource for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}
