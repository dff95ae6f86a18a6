//! Scheduler configuration structure.

use std::time::Duration;

use anyhow::Context;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, DEFAULT_MAX_ATTEMPTS};

/// Scheduler configuration.
///
/// Missing fields take their defaults, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// First hour of the calling window (inclusive).
    pub calling_hours_start: u32,
    /// Hour the calling window closes (exclusive).
    pub calling_hours_end: u32,
    /// Delay before a retry, in minutes.
    pub retry_delay_minutes: u64,
    /// Sleep when nothing is due, in seconds.
    pub poll_interval_secs: u64,
    /// Maximum calls in flight.
    pub max_concurrent_calls: usize,
    /// Attempts per lead, first call included.
    pub max_attempts: u32,
    /// Maximum pending attempts before submissions are rejected.
    pub max_queue_depth: usize,
    /// Delay before the first call of a lead submitted inside the window, in seconds.
    pub first_call_delay_secs: u64,
    /// Sleep while outside the window, in seconds.
    pub outside_window_sleep_secs: u64,
    /// Sleep while at the concurrency ceiling, in seconds.
    pub capacity_sleep_secs: u64,
    /// Sleep after a failed loop iteration, in seconds.
    pub fault_backoff_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            calling_hours_start: 9,
            calling_hours_end: 19,
            retry_delay_minutes: 240,
            poll_interval_secs: 30,
            max_concurrent_calls: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_queue_depth: 10_000,
            first_call_delay_secs: 120,
            outside_window_sleep_secs: 300,
            capacity_sleep_secs: 60,
            fault_backoff_secs: 60,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.calling_hours_start >= self.calling_hours_end {
            return Err(format!(
                "calling_hours_start ({}) must be before calling_hours_end ({})",
                self.calling_hours_start, self.calling_hours_end
            ));
        }
        if self.calling_hours_end > 24 {
            return Err("calling_hours_end must be at most 24".into());
        }
        if self.max_concurrent_calls == 0 {
            return Err("max_concurrent_calls must be greater than 0".into());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".into());
        }
        if self.max_queue_depth == 0 {
            return Err("max_queue_depth must be greater than 0".into());
        }
        for (name, value) in [
            ("retry_delay_minutes", self.retry_delay_minutes),
            ("poll_interval_secs", self.poll_interval_secs),
            ("first_call_delay_secs", self.first_call_delay_secs),
            ("outside_window_sleep_secs", self.outside_window_sleep_secs),
            ("capacity_sleep_secs", self.capacity_sleep_secs),
            ("fault_backoff_secs", self.fault_backoff_secs),
        ] {
            if value == 0 {
                return Err(format!("{name} must be greater than 0"));
            }
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from a variable lookup, starting from defaults.
    ///
    /// Unset variables keep their default. A set but unparsable value is an error.
    pub fn from_lookup<F, E>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Result<String, E>,
    {
        let mut cfg = Self::default();
        read_var(&lookup, "CALLING_HOURS_START", &mut cfg.calling_hours_start)?;
        read_var(&lookup, "CALLING_HOURS_END", &mut cfg.calling_hours_end)?;
        read_var(&lookup, "RETRY_DELAY_MINUTES", &mut cfg.retry_delay_minutes)?;
        read_var(&lookup, "POLL_INTERVAL_SECONDS", &mut cfg.poll_interval_secs)?;
        read_var(&lookup, "MAX_CONCURRENT_CALLS", &mut cfg.max_concurrent_calls)?;
        read_var(&lookup, "MAX_CALL_ATTEMPTS", &mut cfg.max_attempts)?;
        read_var(&lookup, "MAX_QUEUE_DEPTH", &mut cfg.max_queue_depth)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, String> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(format!(".env error: {err}"));
            }
        }
        Self::from_lookup(|name| std::env::var(name))
    }

    /// First-call delay.
    pub fn first_call_delay(&self) -> TimeDelta {
        TimeDelta::seconds(i64::try_from(self.first_call_delay_secs).unwrap_or(i64::MAX))
    }

    /// Retry delay.
    pub fn retry_delay(&self) -> TimeDelta {
        TimeDelta::minutes(i64::try_from(self.retry_delay_minutes).unwrap_or(i64::MAX))
    }

    /// Idle poll interval.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Sleep while outside the window.
    pub const fn outside_window_sleep(&self) -> Duration {
        Duration::from_secs(self.outside_window_sleep_secs)
    }

    /// Sleep at the concurrency ceiling.
    pub const fn capacity_sleep(&self) -> Duration {
        Duration::from_secs(self.capacity_sleep_secs)
    }

    /// Sleep after a failed iteration.
    pub const fn fault_backoff(&self) -> Duration {
        Duration::from_secs(self.fault_backoff_secs)
    }
}

fn read_var<F, E, T>(lookup: &F, name: &str, target: &mut T) -> Result<(), String>
where
    F: Fn(&str) -> Result<String, E>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = lookup(name) else {
        return Ok(());
    };
    *target = raw
        .trim()
        .parse()
        .map_err(|e| format!("{name}={raw:?} is invalid: {e}"))?;
    Ok(())
}

/// Load configuration from the environment for application entry points.
pub fn load_env_config() -> AppResult<SchedulerConfig> {
    let cfg = SchedulerConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading scheduler configuration")?;
    tracing::info!(
        start = cfg.calling_hours_start,
        end = cfg.calling_hours_end,
        max_concurrent = cfg.max_concurrent_calls,
        max_attempts = cfg.max_attempts,
        "scheduler configuration loaded"
    );
    Ok(cfg)
}
