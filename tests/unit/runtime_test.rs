//! Tests for the API request/response models

use std::sync::Arc;

use call_scheduler::builders::build_scheduler;
use call_scheduler::config::SchedulerConfig;
use call_scheduler::core::{AttemptOutcome, CallStatus};
use call_scheduler::infra::{DryRunTelephony, InMemoryNotes};
use call_scheduler::runtime::{
    health, report_call_status, submit_lead, CallStatusReport, LeadSubmission,
};
use call_scheduler::util::clock::{Clock, ManualClock};
use chrono::{NaiveDate, TimeDelta};

#[test]
fn test_lead_submission_accepts_crm_fields() {
    let json = r#"{
        "lead_id": "L9",
        "payload": { "Phone": "9876543210", "First_Name": "Ada", "Last_Name": "Lovelace", "Company": "AE" }
    }"#;
    let req: LeadSubmission = serde_json::from_str(json).unwrap();
    assert_eq!(req.subject_id.as_str(), "L9");
    assert_eq!(req.payload.contact_address().as_deref(), Some("+919876543210"));
    assert_eq!(req.payload.display_name(), "Ada Lovelace");
    assert_eq!(req.payload.extra["Company"], "AE");
}

#[test]
fn test_call_status_report_accepts_vendor_fields() {
    let json = r#"{ "subject_id": "L1", "CallStatus": "no-answer", "CallSid": "CA42" }"#;
    let report: CallStatusReport = serde_json::from_str(json).unwrap();
    assert_eq!(report.status, CallStatus::NoAnswer);
    assert_eq!(report.call_id.as_deref(), Some("CA42"));
    assert!(report.result.is_null());
}

#[tokio::test]
async fn test_submit_and_report_through_api() {
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    ));
    let scheduler = build_scheduler(
        &SchedulerConfig::default(),
        DryRunTelephony::new(),
        InMemoryNotes::new(),
        clock.clone(),
    )
    .unwrap();

    let accepted = submit_lead(
        &scheduler,
        LeadSubmission {
            subject_id: "L1".into(),
            payload: call_scheduler::core::ContactPayload::with_phone("+15550100"),
        },
    )
    .unwrap();
    assert_eq!(accepted.attempt_number, 1);
    assert_eq!(accepted.due_time, clock.now() + TimeDelta::minutes(2));

    let duplicate = submit_lead(
        &scheduler,
        LeadSubmission {
            subject_id: "L1".into(),
            payload: Default::default(),
        },
    );
    assert!(duplicate.unwrap_err().contains("already queued"));

    clock.advance(TimeDelta::minutes(2));
    scheduler.tick().await.unwrap();

    let outcome = report_call_status(
        &scheduler,
        serde_json::from_str(r#"{ "subject_id": "L1", "status": "completed" }"#).unwrap(),
    )
    .await;
    assert!(matches!(outcome, AttemptOutcome::Completed { attempt_number: 1, .. }));

    let h = health(&scheduler);
    assert!(!h.ok);
    assert_eq!(h.status.completed_count, 1);
}
