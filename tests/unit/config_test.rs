//! Tests for configuration validation

use call_scheduler::config::SchedulerConfig;
use std::time::Duration;

#[test]
fn test_defaults_are_valid() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.calling_hours_start, 9);
    assert_eq!(cfg.calling_hours_end, 19);
    assert_eq!(cfg.retry_delay_minutes, 240);
    assert_eq!(cfg.max_attempts, 3);
    assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
    assert_eq!(cfg.outside_window_sleep(), Duration::from_secs(300));
    assert_eq!(cfg.capacity_sleep(), Duration::from_secs(60));
    assert_eq!(cfg.first_call_delay(), chrono::TimeDelta::minutes(2));
}

#[test]
fn test_inverted_window_rejected() {
    let cfg = SchedulerConfig {
        calling_hours_start: 19,
        calling_hours_end: 9,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_window_past_midnight_rejected() {
    let cfg = SchedulerConfig {
        calling_hours_start: 9,
        calling_hours_end: 25,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_zero_ceiling_rejected() {
    let cfg = SchedulerConfig {
        max_concurrent_calls: 0,
        ..SchedulerConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("max_concurrent_calls"));
}

#[test]
fn test_zero_interval_rejected() {
    let cfg = SchedulerConfig {
        poll_interval_secs: 0,
        ..SchedulerConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("poll_interval_secs"));
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "calling_hours_start": 8,
        "calling_hours_end": 20,
        "max_concurrent_calls": 4
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.calling_hours_start, 8);
    assert_eq!(cfg.calling_hours_end, 20);
    assert_eq!(cfg.max_concurrent_calls, 4);
    assert_eq!(cfg.retry_delay_minutes, 240);
}

#[test]
fn test_scheduler_config_from_json_invalid() {
    assert!(SchedulerConfig::from_json_str("{ not json").is_err());
    assert!(SchedulerConfig::from_json_str(r#"{"max_attempts": 0}"#).is_err());
}

#[test]
fn test_from_lookup_reads_known_variables() {
    let cfg = SchedulerConfig::from_lookup(|name| match name {
        "CALLING_HOURS_END" => Ok("21".to_string()),
        "RETRY_DELAY_MINUTES" => Ok("60".to_string()),
        "POLL_INTERVAL_SECONDS" => Ok("5".to_string()),
        "MAX_QUEUE_DEPTH" => Ok("50".to_string()),
        _ => Err(()),
    })
    .unwrap();

    assert_eq!(cfg.calling_hours_end, 21);
    assert_eq!(cfg.retry_delay(), chrono::TimeDelta::hours(1));
    assert_eq!(cfg.poll_interval(), Duration::from_secs(5));
    assert_eq!(cfg.max_queue_depth, 50);
}

#[test]
fn test_from_lookup_validates_result() {
    let result = SchedulerConfig::from_lookup(|name| match name {
        "CALLING_HOURS_START" => Ok("20".to_string()),
        _ => Err(()),
    });
    assert!(result.is_err());
}
