//! Audit sink implementations.
//!
//! The scheduler records one event per transition when a sink is attached.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::serde::SubjectId;

/// Scheduler transition being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Attempt accepted into the queue.
    Enqueued,
    /// Attempt handed to the telephony client.
    Dispatched,
    /// Follow-up attempt queued.
    RetryScheduled,
    /// Subject reached terminal success.
    Completed,
    /// Subject reached terminal failure.
    Failed,
}

impl AuditAction {
    /// Wire name of the action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enqueued => "enqueued",
            Self::Dispatched => "dispatched",
            Self::RetryScheduled => "retry_scheduled",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Subject the transition applies to.
    pub subject_id: SubjectId,
    /// Action taken.
    pub action: AuditAction,
    /// Attempt number involved.
    pub attempt_number: u32,
    /// Local timestamp.
    pub created_at: NaiveDateTime,
    /// Additional context (status, reason, due time).
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Shared sink, so callers can keep a handle and read events back.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// Helper to build an audit event with a fresh id.
pub fn build_audit_event(
    subject_id: SubjectId,
    action: AuditAction,
    attempt_number: u32,
    created_at: NaiveDateTime,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        subject_id,
        action,
        attempt_number,
        created_at,
        detail,
    }
}
