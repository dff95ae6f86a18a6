//! Tests for audit sink

use call_scheduler::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};
use chrono::NaiveDate;

fn ts() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("L1".into(), AuditAction::Enqueued, 1, ts(), Some("due".to_string()));

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].subject_id.as_str(), "L1");
    assert_eq!(events[0].action, AuditAction::Enqueued);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("L1".into(), AuditAction::Enqueued, 1, ts(), None));
    sink.record(build_audit_event("L2".into(), AuditAction::Enqueued, 1, ts(), None));
    sink.record(build_audit_event("L3".into(), AuditAction::Enqueued, 1, ts(), None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].subject_id.as_str(), "L2"); // First one popped
    assert_eq!(events[1].subject_id.as_str(), "L3");
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("L1".into(), AuditAction::Failed, 3, ts(), None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event(
        "L1".into(),
        AuditAction::RetryScheduled,
        2,
        ts(),
        Some("busy".to_string()),
    );
    let b = build_audit_event("L1".into(), AuditAction::RetryScheduled, 2, ts(), None);

    assert_ne!(a.event_id, b.event_id);
    assert_eq!(a.attempt_number, 2);
    assert_eq!(a.created_at, ts());
    assert_eq!(a.detail, Some("busy".to_string()));
    assert_eq!(a.action.to_string(), "retry_scheduled");
}

#[test]
fn test_audit_event_serializes_action_snake_case() {
    let event = build_audit_event("L1".into(), AuditAction::RetryScheduled, 2, ts(), None);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "retry_scheduled");
    assert_eq!(json["subject_id"], "L1");
}
