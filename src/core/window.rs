//! Daily calling window gate.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::core::SchedulerError;
use crate::util::clock::Clock;

/// Local-time window `[start_hour, end_hour)` during which dialing is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallingWindow {
    start_hour: u32,
    end_hour: u32,
    opens_at: NaiveTime,
}

impl CallingWindow {
    /// Build a window. Requires `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, SchedulerError> {
        let invalid = SchedulerError::InvalidWindow {
            start: start_hour,
            end: end_hour,
        };
        if start_hour >= end_hour || end_hour > 24 {
            return Err(invalid);
        }
        let opens_at = NaiveTime::from_hms_opt(start_hour, 0, 0).ok_or(invalid)?;
        Ok(Self {
            start_hour,
            end_hour,
            opens_at,
        })
    }

    /// First permitted hour.
    pub const fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// First hour after the window closes.
    pub const fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Whether `t` falls inside the window.
    pub fn is_instant_in_window(&self, t: NaiveDateTime) -> bool {
        (self.start_hour..self.end_hour).contains(&t.hour())
    }

    /// Whether the clock's current time falls inside the window.
    pub fn is_now_in_window(&self, clock: &dyn Clock) -> bool {
        self.is_instant_in_window(clock.now())
    }

    /// Earliest permitted instant at or after `from`.
    ///
    /// Inside the window `from` is returned unchanged. Before opening time it
    /// is today's opening; after closing it is tomorrow's.
    pub fn next_window_start(&self, from: NaiveDateTime) -> NaiveDateTime {
        if self.is_instant_in_window(from) {
            return from;
        }
        if from.hour() < self.start_hour {
            from.date().and_time(self.opens_at)
        } else {
            (from + TimeDelta::days(1)).date().and_time(self.opens_at)
        }
    }
}
