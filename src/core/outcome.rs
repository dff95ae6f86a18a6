//! Outcome classification for dispatch results and reported call statuses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::attempt::FailureReason;
use crate::core::error::TelephonyError;

/// Call status reported by the telephony vendor on completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    /// Call ran to completion.
    Completed,
    /// Callee answered.
    Answered,
    /// Nobody picked up.
    NoAnswer,
    /// Line busy.
    Busy,
    /// Any status outside the known vocabulary.
    Other(String),
}

impl CallStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Answered => "answered",
            Self::NoAnswer => "no-answer",
            Self::Busy => "busy",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for CallStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "answered" => Self::Answered,
            "no-answer" => Self::NoAnswer,
            "busy" => Self::Busy,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl From<String> for CallStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a subject once its call has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Reschedule through the retry policy.
    Retry(FailureReason),
    /// Terminal success.
    Success,
    /// Unknown status: record as completed, but flag it.
    Unexpected,
}

/// Classify a completion status.
///
/// Unknown statuses are terminal so the active set always drains, even when
/// the vendor introduces states this crate does not know.
pub const fn classify_call_status(status: &CallStatus) -> Verdict {
    match status {
        CallStatus::NoAnswer => Verdict::Retry(FailureReason::NoAnswer),
        CallStatus::Busy => Verdict::Retry(FailureReason::Busy),
        CallStatus::Completed | CallStatus::Answered => Verdict::Success,
        CallStatus::Other(_) => Verdict::Unexpected,
    }
}

/// Classify a telephony failure at dispatch time.
pub const fn classify_dispatch_error(err: &TelephonyError) -> FailureReason {
    match err {
        TelephonyError::NoResult | TelephonyError::Rejected(_) => FailureReason::InitiationFailed,
        TelephonyError::Unexpected(_) => FailureReason::Exception,
    }
}
