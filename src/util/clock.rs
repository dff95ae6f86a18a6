//! Wall-clock abstraction.
//!
//! The calling window is expressed in local wall-clock hours, so the scheduler
//! reads time as a [`NaiveDateTime`] in the local zone. Tests swap in a
//! [`ManualClock`] to move time without sleeping.

use chrono::{Local, NaiveDateTime, TimeDelta};
use parking_lot::Mutex;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by the system local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        now_local()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: NaiveDateTime) {
        *self.now.lock() = to;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// Current local wall-clock time.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}
