//! Attempt record store: active, completed and failed attempts per subject.
//!
//! All state sits behind one `parking_lot::Mutex`. Every method takes the lock
//! for the duration of a single map operation and never across an await.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use parking_lot::Mutex;

use crate::core::attempt::{
    ActiveAttempt, CompletedAttempt, DispatchStatus, FailedAttempt, FailureReason,
    ScheduledAttempt,
};
use crate::core::outcome::CallStatus;
use crate::core::SchedulerError;
use crate::util::serde::SubjectId;

#[derive(Default)]
struct Records {
    active: HashMap<SubjectId, ActiveAttempt>,
    completed: Vec<CompletedAttempt>,
    failed: Vec<FailedAttempt>,
    next_seq: u64,
}

impl Records {
    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Thread-safe store of attempt records.
#[derive(Default)]
pub struct AttemptStore {
    inner: Mutex<Records>,
}

impl AttemptStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `attempt` as in flight, in the initiating state.
    pub fn mark_active(
        &self,
        attempt: ScheduledAttempt,
        started_at: NaiveDateTime,
    ) -> Result<(), SchedulerError> {
        let mut records = self.inner.lock();
        if records.active.contains_key(&attempt.subject_id) {
            return Err(SchedulerError::AlreadyActive(attempt.subject_id));
        }
        records.active.insert(
            attempt.subject_id.clone(),
            ActiveAttempt {
                attempt,
                started_at,
                status: DispatchStatus::Initiating,
                external_call_id: None,
            },
        );
        Ok(())
    }

    /// Move an active attempt to calling. Returns false if the subject is no
    /// longer active (a report may have raced ahead of the dispatch).
    pub fn mark_calling(&self, subject: &SubjectId, external_call_id: String) -> bool {
        let mut records = self.inner.lock();
        match records.active.get_mut(subject) {
            Some(active) => {
                active.status = DispatchStatus::Calling;
                active.external_call_id = Some(external_call_id);
                true
            }
            None => false,
        }
    }

    /// Take the active attempt for `subject`, if any.
    pub fn remove_active(&self, subject: &SubjectId) -> Option<ActiveAttempt> {
        self.inner.lock().active.remove(subject)
    }

    /// Append a terminal success.
    pub fn record_completed(
        &self,
        subject_id: SubjectId,
        attempt_number: u32,
        status: CallStatus,
        result: serde_json::Value,
        completed_at: NaiveDateTime,
    ) {
        let mut records = self.inner.lock();
        let seq = records.take_seq();
        records.completed.push(CompletedAttempt {
            subject_id,
            attempt_number,
            status,
            result,
            completed_at,
            seq,
        });
    }

    /// Append a terminal failure.
    pub fn record_failed(
        &self,
        subject_id: SubjectId,
        reason: FailureReason,
        attempt_number: u32,
        failed_at: NaiveDateTime,
    ) {
        let mut records = self.inner.lock();
        let seq = records.take_seq();
        records.failed.push(FailedAttempt {
            subject_id,
            reason,
            attempt_number,
            failed_at,
            seq,
        });
    }

    /// Whether `subject` has an attempt in flight.
    pub fn is_active(&self, subject: &SubjectId) -> bool {
        self.inner.lock().active.contains_key(subject)
    }

    /// Snapshot of the active attempt for `subject`.
    pub fn active(&self, subject: &SubjectId) -> Option<ActiveAttempt> {
        self.inner.lock().active.get(subject).cloned()
    }

    /// Number of attempts in flight.
    pub fn active_count(&self) -> usize {
        self.inner.lock().active.len()
    }

    /// Number of completed records.
    pub fn completed_count(&self) -> usize {
        self.inner.lock().completed.len()
    }

    /// Number of failed records.
    pub fn failed_count(&self) -> usize {
        self.inner.lock().failed.len()
    }

    /// Up to `limit` completed records, newest first.
    pub fn recent_completed(&self, limit: usize) -> Vec<CompletedAttempt> {
        self.inner
            .lock()
            .completed
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Up to `limit` failed records, newest first.
    pub fn recent_failed(&self, limit: usize) -> Vec<FailedAttempt> {
        self.inner
            .lock()
            .failed
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}
