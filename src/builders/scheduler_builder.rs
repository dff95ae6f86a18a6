//! Build a call scheduler from configuration.

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{
    CallScheduler, CallingWindow, CrmClient, RetryPolicy, SchedulerError, SchedulerLimits,
    TelephonyClient,
};
use crate::infra::queue::InMemoryQueue;
use crate::util::clock::Clock;

/// Validate `cfg` and wire a stopped scheduler around the given collaborators.
pub fn build_scheduler<T, C>(
    cfg: &SchedulerConfig,
    telephony: T,
    crm: C,
    clock: Arc<dyn Clock>,
) -> Result<CallScheduler<T, C>, SchedulerError>
where
    T: TelephonyClient,
    C: CrmClient,
{
    cfg.validate()
        .map_err(|e| SchedulerError::InvalidConfig(format!("config invalid: {e}")))?;

    let window = CallingWindow::new(cfg.calling_hours_start, cfg.calling_hours_end)?;
    let policy = RetryPolicy::new(
        window,
        cfg.first_call_delay(),
        cfg.retry_delay(),
        cfg.max_attempts,
    );
    let limits = SchedulerLimits {
        max_concurrent_calls: cfg.max_concurrent_calls,
        poll_interval: cfg.poll_interval(),
        outside_window_sleep: cfg.outside_window_sleep(),
        capacity_sleep: cfg.capacity_sleep(),
        fault_backoff: cfg.fault_backoff(),
    };
    let queue = InMemoryQueue::new(cfg.max_queue_depth);

    tracing::debug!(
        window_start = window.start_hour(),
        window_end = window.end_hour(),
        max_depth = cfg.max_queue_depth,
        "building call scheduler"
    );
    Ok(CallScheduler::new(limits, policy, queue, telephony, crm, clock))
}
