//! Error types for scheduler operations and collaborator calls.

use thiserror::Error;

use crate::util::serde::SubjectId;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The subject already has an attempt in flight.
    #[error("subject {0} already has an active attempt")]
    AlreadyActive(SubjectId),
    /// The subject already has a pending attempt in the queue.
    #[error("subject {0} is already queued")]
    AlreadyQueued(SubjectId),
    /// Queue is full.
    #[error("queue full: {0}")]
    QueueFull(String),
    /// Calling window bounds are unusable.
    #[error("invalid calling window: start={start} end={end}")]
    InvalidWindow {
        /// Configured start hour.
        start: u32,
        /// Configured end hour.
        end: u32,
    },
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A loop iteration panicked and was abandoned.
    #[error("scheduler iteration panicked")]
    Panicked,
}

/// Failure reported by a telephony client when placing a call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TelephonyError {
    /// The vendor accepted the request but returned no call.
    #[error("no call returned")]
    NoResult,
    /// The vendor refused the call.
    #[error("call rejected: {0}")]
    Rejected(String),
    /// Anything the client did not anticipate.
    #[error("unexpected telephony fault: {0}")]
    Unexpected(String),
}

/// Failure reported by a CRM client when writing a note.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrmError {
    /// CRM could not be reached.
    #[error("crm unavailable: {0}")]
    Unavailable(String),
    /// CRM refused the write.
    #[error("crm rejected note: {0}")]
    Rejected(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
