//! Core scheduling abstractions: attempts, the calling window, retry policy,
//! outcome classification, and the scheduler itself.

pub mod attempt;
pub mod audit;
pub mod collaborator;
pub mod contact;
pub mod error;
pub mod outcome;
pub mod records;
pub mod retry;
pub mod scheduler;
pub mod window;

pub use attempt::{
    ActiveAttempt, CompletedAttempt, DispatchStatus, FailedAttempt, FailureReason,
    ScheduledAttempt, DEFAULT_MAX_ATTEMPTS,
};
pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use collaborator::{CallRequest, CrmClient, PlacedCall, TelephonyClient};
pub use contact::{normalize_phone, ContactPayload};
pub use error::{AppResult, CrmError, SchedulerError, TelephonyError};
pub use outcome::{classify_call_status, classify_dispatch_error, CallStatus, Verdict};
pub use records::AttemptStore;
pub use retry::{RetryDecision, RetryPolicy};
pub use scheduler::{
    ActivityEvent, AttemptOutcome, CallScheduler, QueueStatus, SchedulerLimits, TickOutcome,
};
pub use window::CallingWindow;
