//! Tests for utility functions

use call_scheduler::util::{Clock, ManualClock, Priority, SubjectId};
use chrono::{NaiveDate, TimeDelta};

#[test]
fn test_priority_rank() {
    assert!(Priority::NewLead.rank() < Priority::Retry.rank());
    assert_eq!(Priority::NewLead.rank(), 1);
    assert_eq!(Priority::Retry.rank(), 2);
}

#[test]
fn test_priority_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&Priority::NewLead).unwrap(), "\"new_lead\"");
}

#[test]
fn test_subject_id_is_transparent() {
    let id = SubjectId::new("lead-7");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"lead-7\"");
    let back: SubjectId = serde_json::from_str("\"lead-7\"").unwrap();
    assert_eq!(back, id);
    assert_eq!(id.to_string(), "lead-7");
}

#[test]
fn test_manual_clock() {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);

    clock.advance(TimeDelta::hours(13));
    assert_eq!(clock.now(), start + TimeDelta::hours(13));

    clock.set(start);
    assert_eq!(clock.now(), start);
}

#[test]
fn test_init_tracing_is_idempotent() {
    call_scheduler::util::init_tracing();
    call_scheduler::util::init_tracing();
    tracing::info!("tracing initialized");
}
