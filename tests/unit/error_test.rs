//! Tests for error types

use call_scheduler::core::{CrmError, SchedulerError, TelephonyError};
use call_scheduler::util::serde::SubjectId;

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull("max queue depth reached".to_string());
    assert_eq!(format!("{}", err), "queue full: max queue depth reached");
}

#[test]
fn test_already_active_error() {
    let err = SchedulerError::AlreadyActive(SubjectId::new("L1"));
    assert_eq!(format!("{}", err), "subject L1 already has an active attempt");
}

#[test]
fn test_already_queued_error() {
    let err = SchedulerError::AlreadyQueued(SubjectId::new("L1"));
    assert_eq!(format!("{}", err), "subject L1 is already queued");
}

#[test]
fn test_invalid_window_error() {
    let err = SchedulerError::InvalidWindow { start: 19, end: 9 };
    assert_eq!(format!("{}", err), "invalid calling window: start=19 end=9");
}

#[test]
fn test_panicked_error() {
    assert_eq!(SchedulerError::Panicked.to_string(), "scheduler iteration panicked");
}

#[test]
fn test_collaborator_errors() {
    assert_eq!(TelephonyError::NoResult.to_string(), "no call returned");
    assert_eq!(
        TelephonyError::Rejected("invalid number".into()).to_string(),
        "call rejected: invalid number"
    );
    assert_eq!(
        CrmError::Unavailable("timeout".into()).to_string(),
        "crm unavailable: timeout"
    );
}

#[test]
fn test_scheduler_error_into_anyhow() {
    fn check(ok: bool) -> Result<(), SchedulerError> {
        if ok {
            Ok(())
        } else {
            Err(SchedulerError::InvalidConfig("bad".into()))
        }
    }
    fn fails() -> call_scheduler::core::AppResult<()> {
        check(false)?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: bad");
}
