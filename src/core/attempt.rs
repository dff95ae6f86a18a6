//! Attempt records: scheduled, in flight, and terminal.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::contact::ContactPayload;
use crate::core::outcome::CallStatus;
use crate::util::serde::{Priority, SubjectId};

/// Default cap on dial attempts per subject.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A pending dial. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAttempt {
    /// Dispatch class; lower rank goes first.
    pub priority: Priority,
    /// Earliest local time the attempt may run.
    pub due_time: NaiveDateTime,
    /// Lead being called.
    pub subject_id: SubjectId,
    /// Contact data needed to dial.
    pub payload: ContactPayload,
    /// 1-based attempt counter.
    pub attempt_number: u32,
    /// Attempt cap for this subject.
    pub max_attempts: u32,
}

impl ScheduledAttempt {
    /// True once this attempt is the last one allowed.
    pub const fn is_final(&self) -> bool {
        self.attempt_number >= self.max_attempts
    }
}

/// Progress of an in-flight dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Marked active, vendor call not yet placed.
    Initiating,
    /// Vendor accepted the call.
    Calling,
}

/// The one in-flight attempt for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAttempt {
    /// The attempt that was dispatched.
    pub attempt: ScheduledAttempt,
    /// When dispatch began.
    pub started_at: NaiveDateTime,
    /// Current dispatch progress.
    pub status: DispatchStatus,
    /// Vendor-assigned call id once calling.
    pub external_call_id: Option<String>,
}

/// Why an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// Payload had no usable contact address. Never retried.
    #[serde(rename = "no_phone")]
    NoPhone,
    /// Telephony client returned nothing or refused the call.
    #[serde(rename = "initiation_failed")]
    InitiationFailed,
    /// Unexpected fault while dispatching.
    #[serde(rename = "exception")]
    Exception,
    /// Callee did not pick up.
    #[serde(rename = "no-answer")]
    NoAnswer,
    /// Callee line was busy.
    #[serde(rename = "busy")]
    Busy,
}

impl FailureReason {
    /// Wire name of the reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoPhone => "no_phone",
            Self::InitiationFailed => "initiation_failed",
            Self::Exception => "exception",
            Self::NoAnswer => "no-answer",
            Self::Busy => "busy",
        }
    }

    /// Whether another attempt may follow, attempt budget permitting.
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::NoPhone)
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal success record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedAttempt {
    /// Lead that was called.
    pub subject_id: SubjectId,
    /// Attempt that completed.
    pub attempt_number: u32,
    /// Final vendor status.
    pub status: CallStatus,
    /// Opaque result reported alongside the status.
    pub result: serde_json::Value,
    /// When the completion was recorded.
    pub completed_at: NaiveDateTime,
    /// Store-wide write order, shared with failed records.
    pub seq: u64,
}

/// Terminal failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAttempt {
    /// Lead that was called.
    pub subject_id: SubjectId,
    /// Why the last attempt failed.
    pub reason: FailureReason,
    /// Attempt number at which the subject was given up.
    pub attempt_number: u32,
    /// When the failure was recorded.
    pub failed_at: NaiveDateTime,
    /// Store-wide write order, shared with completed records.
    pub seq: u64,
}
