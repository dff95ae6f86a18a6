//! Tests for the in-memory CRM and dry-run telephony adapters

use call_scheduler::core::{CallRequest, CrmClient, CrmError, TelephonyClient};
use call_scheduler::infra::{DryRunTelephony, InMemoryNotes};
use call_scheduler::util::serde::SubjectId;

#[tokio::test]
async fn test_notes_append_and_fetch() {
    let notes = InMemoryNotes::new();
    let id = SubjectId::new("L1");

    notes.append_note(&id, "first").await.unwrap();
    notes.append_note(&id, "second").await.unwrap();
    notes.append_note(&"L2".into(), "other").await.unwrap();

    let fetched = notes.fetch(&id, 10);
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].text, "first");
    assert_eq!(fetched[1].text, "second");
    assert_eq!(notes.fetch(&id, 1).len(), 1);
    assert_eq!(notes.len(), 3);
}

#[tokio::test]
async fn test_notes_fetch_unknown_subject_is_empty() {
    let notes = InMemoryNotes::new();
    assert!(notes.fetch(&"nobody".into(), 10).is_empty());
    assert!(notes.is_empty());
}

#[tokio::test]
async fn test_notes_unavailable() {
    let notes = InMemoryNotes::new();
    let shared = notes.clone();
    shared.set_unavailable(true);

    let err = notes.append_note(&"L1".into(), "lost").await.unwrap_err();
    assert!(matches!(err, CrmError::Unavailable(_)));
    assert!(notes.is_empty());

    shared.set_unavailable(false);
    notes.append_note(&"L1".into(), "kept").await.unwrap();
    assert_eq!(shared.len(), 1);
}

#[tokio::test]
async fn test_dry_run_telephony_records_requests() {
    let telephony = DryRunTelephony::new();
    let request = CallRequest {
        address: "+15550100".into(),
        subject_id: "L1".into(),
        display_name: "Ada Lovelace".into(),
    };

    let first = telephony.place_call(request.clone()).await.unwrap();
    let second = telephony.place_call(request.clone()).await.unwrap();

    assert_eq!(first.status, "queued");
    assert!(first.external_call_id.starts_with("dry-"));
    assert_ne!(first.external_call_id, second.external_call_id);
    assert_eq!(telephony.placed(), vec![request.clone(), request]);
}
