//! Retry policy: when an attempt runs and whether another may follow.

use chrono::{NaiveDateTime, TimeDelta};

use crate::core::attempt::ScheduledAttempt;
use crate::core::contact::ContactPayload;
use crate::core::window::CallingWindow;
use crate::util::serde::{Priority, SubjectId};

/// Result of asking for a follow-up attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// Enqueue this attempt.
    Retry(ScheduledAttempt),
    /// Attempt budget is spent; record the subject as failed.
    Exhausted {
        /// Number of the attempt that just failed.
        attempt_number: u32,
    },
}

/// Computes due times and attempt numbers for first calls and retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    window: CallingWindow,
    first_call_delay: TimeDelta,
    retry_delay: TimeDelta,
    max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy over `window`.
    pub const fn new(
        window: CallingWindow,
        first_call_delay: TimeDelta,
        retry_delay: TimeDelta,
        max_attempts: u32,
    ) -> Self {
        Self {
            window,
            first_call_delay,
            retry_delay,
            max_attempts,
        }
    }

    /// Window the policy schedules into.
    pub const fn window(&self) -> &CallingWindow {
        &self.window
    }

    /// Attempt cap.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// First attempt for a new lead.
    ///
    /// Inside the window it runs shortly after `now`; outside, at the next opening.
    pub fn schedule_first(
        &self,
        subject_id: SubjectId,
        payload: ContactPayload,
        now: NaiveDateTime,
    ) -> ScheduledAttempt {
        let due_time = if self.window.is_instant_in_window(now) {
            now + self.first_call_delay
        } else {
            self.window.next_window_start(now)
        };
        ScheduledAttempt {
            priority: Priority::NewLead,
            due_time,
            subject_id,
            payload,
            attempt_number: 1,
            max_attempts: self.max_attempts,
        }
    }

    /// Follow-up after attempt `attempt_number` failed retryably.
    pub fn schedule_retry(
        &self,
        subject_id: SubjectId,
        payload: ContactPayload,
        attempt_number: u32,
        now: NaiveDateTime,
    ) -> RetryDecision {
        if attempt_number >= self.max_attempts {
            return RetryDecision::Exhausted { attempt_number };
        }
        let due_time = self.window.next_window_start(now + self.retry_delay);
        RetryDecision::Retry(ScheduledAttempt {
            priority: Priority::Retry,
            due_time,
            subject_id,
            payload,
            attempt_number: attempt_number + 1,
            max_attempts: self.max_attempts,
        })
    }
}
