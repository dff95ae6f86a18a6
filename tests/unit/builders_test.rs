//! Tests for builder modules

use std::sync::Arc;

use call_scheduler::builders::build_scheduler;
use call_scheduler::config::SchedulerConfig;
use call_scheduler::core::SchedulerError;
use call_scheduler::infra::{DryRunTelephony, InMemoryNotes};
use call_scheduler::util::clock::ManualClock;
use chrono::NaiveDate;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    ))
}

#[test]
fn test_build_scheduler_from_defaults() {
    let cfg = SchedulerConfig::default();
    let scheduler =
        build_scheduler(&cfg, DryRunTelephony::new(), InMemoryNotes::new(), clock()).unwrap();

    assert_eq!(scheduler.limits().max_concurrent_calls, 1);
    assert_eq!(scheduler.limits().poll_interval.as_secs(), 30);
    assert_eq!(scheduler.policy().max_attempts(), 3);
    assert_eq!(scheduler.policy().window().start_hour(), 9);
    assert_eq!(scheduler.policy().window().end_hour(), 19);
    assert!(!scheduler.is_running());

    let status = scheduler.queue_status();
    assert_eq!(status.queue_size, 0);
    assert!(status.in_window_now);
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        calling_hours_start: 20,
        calling_hours_end: 8,
        ..SchedulerConfig::default()
    };
    let result = build_scheduler(&cfg, DryRunTelephony::new(), InMemoryNotes::new(), clock());
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_build_scheduler_applies_queue_depth() {
    let cfg = SchedulerConfig {
        max_queue_depth: 1,
        ..SchedulerConfig::default()
    };
    let scheduler =
        build_scheduler(&cfg, DryRunTelephony::new(), InMemoryNotes::new(), clock()).unwrap();

    scheduler
        .submit_new("L1".into(), call_scheduler::core::ContactPayload::with_phone("+15550100"))
        .unwrap();
    let second = scheduler.submit_new(
        "L2".into(),
        call_scheduler::core::ContactPayload::with_phone("+15550101"),
    );
    assert!(matches!(second, Err(SchedulerError::QueueFull(_))));
}
