//! Call scheduler: the polling loop, dispatch, and completion reporting.
//!
//! The scheduler owns the queue and the attempt store. Two contexts touch them:
//! the loop task (the only place that pulls from the queue and marks attempts
//! active) and the report path, called from whatever receives vendor
//! callbacks.
//!
//! Locks are taken in queue → store order and never held across an await.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use futures::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::attempt::{FailureReason, ScheduledAttempt};
use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::collaborator::{CallRequest, CrmClient, TelephonyClient};
use crate::core::contact::ContactPayload;
use crate::core::outcome::{classify_call_status, classify_dispatch_error, CallStatus, Verdict};
use crate::core::records::AttemptStore;
use crate::core::retry::{RetryDecision, RetryPolicy};
use crate::core::SchedulerError;
use crate::infra::queue::InMemoryQueue;
use crate::util::clock::Clock;
use crate::util::serde::SubjectId;

/// Concurrency ceiling and loop pacing.
#[derive(Debug, Clone)]
pub struct SchedulerLimits {
    /// Maximum attempts in flight at once.
    pub max_concurrent_calls: usize,
    /// Sleep when nothing is due.
    pub poll_interval: Duration,
    /// Sleep while outside the calling window.
    pub outside_window_sleep: Duration,
    /// Sleep while at the concurrency ceiling.
    pub capacity_sleep: Duration,
    /// Sleep after a failed iteration.
    pub fault_backoff: Duration,
}

impl Default for SchedulerLimits {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 1,
            poll_interval: Duration::from_secs(30),
            outside_window_sleep: Duration::from_secs(300),
            capacity_sleep: Duration::from_secs(60),
            fault_backoff: Duration::from_secs(60),
        }
    }
}

/// Where an attempt ended up after a dispatch or a report.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Vendor accepted the call; waiting for a completion report.
    Calling {
        /// Subject being called.
        subject_id: SubjectId,
        /// Vendor call id.
        external_call_id: String,
    },
    /// Terminal success recorded.
    Completed {
        /// Subject that was called.
        subject_id: SubjectId,
        /// Attempt that completed.
        attempt_number: u32,
        /// Reported status.
        status: CallStatus,
    },
    /// A follow-up attempt was queued.
    RetryScheduled {
        /// Subject to call again.
        subject_id: SubjectId,
        /// Number of the queued attempt.
        attempt_number: u32,
        /// When it becomes due.
        due_time: NaiveDateTime,
    },
    /// Terminal failure recorded.
    Failed {
        /// Subject given up on.
        subject_id: SubjectId,
        /// Attempt number at which it was given up.
        attempt_number: u32,
        /// Why.
        reason: FailureReason,
    },
    /// Another path already resolved this subject; nothing was changed.
    Superseded {
        /// Subject concerned.
        subject_id: SubjectId,
    },
    /// Report for a subject with no active attempt; nothing was changed.
    Ignored {
        /// Subject named in the report.
        subject_id: SubjectId,
    },
}

/// What one loop iteration did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Outside the calling window; nothing dispatched.
    OutsideWindow,
    /// At the concurrency ceiling; nothing dispatched.
    AtCapacity,
    /// Nothing due yet.
    Idle,
    /// One attempt was taken off the queue.
    Dispatched(AttemptOutcome),
}

/// Snapshot of scheduler counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Pending attempts.
    pub queue_size: usize,
    /// Attempts in flight.
    pub active_count: usize,
    /// Completed records.
    pub completed_count: usize,
    /// Failed records.
    pub failed_count: usize,
    /// Whether the loop is running.
    pub running: bool,
    /// Whether the current time is inside the calling window.
    pub in_window_now: bool,
}

/// One entry of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    /// A subject reached terminal success.
    Completed {
        /// Subject called.
        subject_id: SubjectId,
        /// When it was recorded.
        timestamp: NaiveDateTime,
        /// Final call status.
        status: CallStatus,
        /// Attempt that completed.
        attempt_number: u32,
    },
    /// A subject reached terminal failure.
    Failed {
        /// Subject called.
        subject_id: SubjectId,
        /// When it was recorded.
        timestamp: NaiveDateTime,
        /// Failure reason.
        reason: FailureReason,
        /// Attempt at which it was given up.
        attempt_number: u32,
    },
}

impl ActivityEvent {
    /// When the event was recorded.
    pub const fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Completed { timestamp, .. } | Self::Failed { timestamp, .. } => *timestamp,
        }
    }

    /// Subject the event concerns.
    pub const fn subject_id(&self) -> &SubjectId {
        match self {
            Self::Completed { subject_id, .. } | Self::Failed { subject_id, .. } => subject_id,
        }
    }
}

/// Handle to a running loop task.
struct LoopHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Loop lifecycle. `Stopping` lasts until the old task has been joined.
enum RunState {
    Idle,
    Running(LoopHandle),
    Stopping,
}

struct Shared<T, C> {
    limits: SchedulerLimits,
    policy: RetryPolicy,
    queue: Mutex<InMemoryQueue>,
    store: AttemptStore,
    telephony: T,
    crm: C,
    clock: Arc<dyn Clock>,
    audit: Mutex<Option<Box<dyn AuditSink>>>,
    runner: Mutex<RunState>,
    /// Serializes `stop` callers across the join.
    lifecycle: tokio::sync::Mutex<()>,
}

/// Attempt taken off the queue by one iteration.
enum Claim {
    /// Payload has no dialable address; never marked active.
    NoAddress(ScheduledAttempt),
    /// Marked active; ready to dial.
    Active(ScheduledAttempt, String),
}

/// Windowed call scheduler with bounded retries.
///
/// Cheap to clone; clones share the same queue, store and loop.
///
/// # Example
///
/// ```rust,ignore
/// let scheduler = build_scheduler(&SchedulerConfig::from_env()?, telephony, crm, Arc::new(SystemClock))?;
/// scheduler.start();
/// scheduler.submit_new("lead-42".into(), ContactPayload::with_phone("+15550100"))?;
/// // later, from the status webhook:
/// scheduler.report_completion("lead-42".into(), "no-answer", serde_json::json!({})).await;
/// scheduler.stop().await;
/// ```
pub struct CallScheduler<T, C> {
    shared: Arc<Shared<T, C>>,
}

impl<T, C> Clone for CallScheduler<T, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, C> CallScheduler<T, C>
where
    T: TelephonyClient,
    C: CrmClient,
{
    /// Create a stopped scheduler from components.
    pub fn new(
        limits: SchedulerLimits,
        policy: RetryPolicy,
        queue: InMemoryQueue,
        telephony: T,
        crm: C,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                limits,
                policy,
                queue: Mutex::new(queue),
                store: AttemptStore::new(),
                telephony,
                crm,
                clock,
                audit: Mutex::new(None),
                runner: Mutex::new(RunState::Idle),
                lifecycle: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(self, audit: Box<dyn AuditSink>) -> Self {
        *self.shared.audit.lock() = Some(audit);
        self
    }

    /// Loop pacing and ceiling.
    pub fn limits(&self) -> &SchedulerLimits {
        &self.shared.limits
    }

    /// Retry policy in force.
    pub fn policy(&self) -> &RetryPolicy {
        &self.shared.policy
    }

    /// Attempt records.
    pub fn store(&self) -> &AttemptStore {
        &self.shared.store
    }

    /// Pending attempts in dispatch order.
    pub fn pending(&self) -> Vec<ScheduledAttempt> {
        self.shared.queue.lock().pending()
    }

    fn now(&self) -> NaiveDateTime {
        self.shared.clock.now()
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Queue the first attempt for a new lead.
    ///
    /// Rejected if the subject is already queued or in flight, or the queue is full.
    pub fn submit_new(
        &self,
        subject_id: SubjectId,
        payload: ContactPayload,
    ) -> Result<ScheduledAttempt, SchedulerError> {
        let now = self.now();
        let attempt = self.shared.policy.schedule_first(subject_id.clone(), payload, now);
        {
            let mut queue = self.shared.queue.lock();
            if self.shared.store.is_active(&subject_id) {
                tracing::warn!(subject = %subject_id, "submission rejected: call in flight");
                return Err(SchedulerError::AlreadyActive(subject_id));
            }
            queue.push(attempt.clone())?;
        }
        tracing::info!(
            subject = %subject_id,
            due = %attempt.due_time,
            "call scheduled for new lead"
        );
        self.audit(
            &subject_id,
            AuditAction::Enqueued,
            attempt.attempt_number,
            Some(attempt.due_time.to_string()),
        );
        Ok(attempt)
    }

    /// Handle a call-completion report from the vendor webhook.
    ///
    /// Reports for subjects with no active attempt (duplicates, late
    /// callbacks) are ignored.
    pub async fn report_completion(
        &self,
        subject_id: SubjectId,
        status: impl Into<CallStatus> + Send,
        result: serde_json::Value,
    ) -> AttemptOutcome {
        let status = status.into();
        let now = self.now();
        let Some(active) = self.shared.store.remove_active(&subject_id) else {
            tracing::info!(
                subject = %subject_id,
                status = %status,
                "completion for subject with no active call, ignoring"
            );
            return AttemptOutcome::Ignored { subject_id };
        };

        let attempt_number = active.attempt.attempt_number;
        tracing::info!(subject = %subject_id, status = %status, attempt = attempt_number, "call completed");

        let outcome = match classify_call_status(&status) {
            Verdict::Retry(reason) => self.route_retry(active.attempt, reason, now),
            Verdict::Success => {
                tracing::info!(subject = %subject_id, "call successfully completed");
                self.complete(subject_id.clone(), attempt_number, status.clone(), result, now)
            }
            Verdict::Unexpected => {
                tracing::warn!(
                    subject = %subject_id,
                    status = %status,
                    "unexpected call status, recording as completed"
                );
                self.complete(subject_id.clone(), attempt_number, status.clone(), result, now)
            }
        };

        self.note(&subject_id, attempt_number, &format!("Call Completed - {status}"))
            .await;
        outcome
    }

    /// Counters for dashboards.
    pub fn queue_status(&self) -> QueueStatus {
        QueueStatus {
            queue_size: self.shared.queue.lock().len(),
            active_count: self.shared.store.active_count(),
            completed_count: self.shared.store.completed_count(),
            failed_count: self.shared.store.failed_count(),
            running: self.is_running(),
            in_window_now: self
                .shared
                .policy
                .window()
                .is_now_in_window(self.shared.clock.as_ref()),
        }
    }

    /// Completed and failed records merged, newest first, at most `limit`.
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityEvent> {
        let completed = self.shared.store.recent_completed(limit).into_iter().map(|c| {
            (
                c.seq,
                ActivityEvent::Completed {
                    subject_id: c.subject_id,
                    timestamp: c.completed_at,
                    status: c.status,
                    attempt_number: c.attempt_number,
                },
            )
        });
        let failed = self.shared.store.recent_failed(limit).into_iter().map(|f| {
            (
                f.seq,
                ActivityEvent::Failed {
                    subject_id: f.subject_id,
                    timestamp: f.failed_at,
                    reason: f.reason,
                    attempt_number: f.attempt_number,
                },
            )
        });
        let mut events: Vec<(u64, ActivityEvent)> = completed.chain(failed).collect();
        events.sort_by(|(a_seq, a), (b_seq, b)| {
            (b.timestamp(), b_seq).cmp(&(a.timestamp(), a_seq))
        });
        events.truncate(limit);
        events.into_iter().map(|(_, event)| event).collect()
    }

    // ------------------------------------------------------------------
    // Loop control
    // ------------------------------------------------------------------

    /// Whether a loop task is alive, including one that is still shutting down.
    pub fn is_running(&self) -> bool {
        match &*self.shared.runner.lock() {
            RunState::Idle => false,
            RunState::Running(handle) => !handle.join.is_finished(),
            RunState::Stopping => true,
        }
    }

    /// Spawn the loop on the current tokio runtime.
    ///
    /// Returns true if a loop was started. Refused while a loop is running or
    /// still being stopped.
    pub fn start(&self) -> bool {
        let mut runner = self.shared.runner.lock();
        match &*runner {
            RunState::Idle => {}
            RunState::Running(handle) if handle.join.is_finished() => {
                tracing::warn!("previous scheduler loop exited on its own, restarting");
            }
            RunState::Running(_) => {
                tracing::debug!("call scheduler already running");
                return false;
            }
            RunState::Stopping => {
                tracing::warn!("call scheduler is stopping, start refused");
                return false;
            }
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let scheduler = self.clone();
        let join = tokio::spawn(async move {
            scheduler.run_loop(shutdown_rx).await;
        });
        *runner = RunState::Running(LoopHandle { shutdown_tx, join });
        tracing::info!("call scheduler started");
        true
    }

    /// Signal the loop and wait for it to exit. No iteration runs after this returns.
    pub async fn stop(&self) {
        let _lifecycle = self.shared.lifecycle.lock().await;
        let state = std::mem::replace(&mut *self.shared.runner.lock(), RunState::Stopping);
        let RunState::Running(LoopHandle { shutdown_tx, join }) = state else {
            *self.shared.runner.lock() = RunState::Idle;
            return;
        };
        // ignore send error: the loop may already have exited
        let _ = shutdown_tx.send(true);
        if let Err(err) = join.await {
            tracing::error!("scheduler loop ended abnormally: {}", err);
        }
        *self.shared.runner.lock() = RunState::Idle;
        tracing::info!("call scheduler stopped");
    }

    async fn run_loop(&self, mut shutdown_rx: watch::Receiver<bool>) {
        tracing::info!("scheduler loop started");
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let iteration = AssertUnwindSafe(self.tick()).catch_unwind().await;
            let pause = match iteration.unwrap_or(Err(SchedulerError::Panicked)) {
                Ok(TickOutcome::OutsideWindow) => {
                    tracing::debug!("outside calling hours, sleeping");
                    Some(self.shared.limits.outside_window_sleep)
                }
                Ok(TickOutcome::AtCapacity) => {
                    tracing::debug!("max concurrent calls reached, waiting");
                    Some(self.shared.limits.capacity_sleep)
                }
                Ok(TickOutcome::Idle) => Some(self.shared.limits.poll_interval),
                Ok(TickOutcome::Dispatched(outcome)) => {
                    tracing::debug!(?outcome, "dispatched");
                    None
                }
                Err(err) => {
                    tracing::error!("error in scheduler loop: {}", err);
                    Some(self.shared.limits.fault_backoff)
                }
            };

            let Some(pause) = pause else {
                tokio::task::yield_now().await;
                continue;
            };
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                () = tokio::time::sleep(pause) => {}
            }
        }
        tracing::info!("scheduler loop stopped");
    }

    /// Run one loop iteration: gate, ceiling, then at most one dispatch.
    pub async fn tick(&self) -> Result<TickOutcome, SchedulerError> {
        let now = self.now();
        if !self.shared.policy.window().is_instant_in_window(now) {
            return Ok(TickOutcome::OutsideWindow);
        }
        if self.shared.store.active_count() >= self.shared.limits.max_concurrent_calls {
            return Ok(TickOutcome::AtCapacity);
        }

        let outcome = match self.claim_due(now)? {
            None => return Ok(TickOutcome::Idle),
            Some(Claim::NoAddress(attempt)) => self.fail_without_dispatch(attempt, now).await,
            Some(Claim::Active(attempt, address)) => {
                let subject_id = attempt.subject_id.clone();
                let dispatched = AssertUnwindSafe(self.dispatch(attempt, address))
                    .catch_unwind()
                    .await;
                match dispatched {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        tracing::error!(subject = %subject_id, "dispatch panicked, releasing attempt");
                        self.handle_dispatch_failure(&subject_id, FailureReason::Exception)
                            .await
                    }
                }
            }
        };
        Ok(TickOutcome::Dispatched(outcome))
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Pop the due head and, if dialable, mark it active under the queue lock
    /// so no submission can slip the same subject in between.
    fn claim_due(&self, now: NaiveDateTime) -> Result<Option<Claim>, SchedulerError> {
        let mut queue = self.shared.queue.lock();
        let Some(attempt) = queue.peek_due(now) else {
            return Ok(None);
        };
        let Some(address) = attempt.payload.contact_address() else {
            return Ok(Some(Claim::NoAddress(attempt)));
        };
        if let Err(err) = self.shared.store.mark_active(attempt.clone(), now) {
            tracing::error!(
                subject = %attempt.subject_id,
                attempt = attempt.attempt_number,
                "dropping due attempt: {}",
                err
            );
            return Err(err);
        }
        Ok(Some(Claim::Active(attempt, address)))
    }

    async fn fail_without_dispatch(
        &self,
        attempt: ScheduledAttempt,
        now: NaiveDateTime,
    ) -> AttemptOutcome {
        let subject_id = attempt.subject_id;
        tracing::error!(subject = %subject_id, "no phone number for lead");
        let outcome = self.fail(subject_id.clone(), FailureReason::NoPhone, attempt.attempt_number, now);
        self.note(
            &subject_id,
            attempt.attempt_number,
            &format!("Call Failed - {}", FailureReason::NoPhone),
        )
        .await;
        outcome
    }

    async fn dispatch(&self, attempt: ScheduledAttempt, address: String) -> AttemptOutcome {
        let subject_id = attempt.subject_id.clone();
        let attempt_number = attempt.attempt_number;
        tracing::info!(
            subject = %subject_id,
            attempt = attempt_number,
            final_attempt = attempt.is_final(),
            "initiating call"
        );
        self.audit(&subject_id, AuditAction::Dispatched, attempt_number, None);

        let request = CallRequest {
            address,
            subject_id: subject_id.clone(),
            display_name: attempt.payload.display_name(),
        };
        let placed = AssertUnwindSafe(self.shared.telephony.place_call(request))
            .catch_unwind()
            .await;

        let reason = match placed {
            Ok(Ok(call)) => {
                tracing::info!(
                    subject = %subject_id,
                    call_id = %call.external_call_id,
                    status = %call.status,
                    "call initiated"
                );
                if !self
                    .shared
                    .store
                    .mark_calling(&subject_id, call.external_call_id.clone())
                {
                    tracing::debug!(subject = %subject_id, "completion reported before call was confirmed");
                }
                self.note(&subject_id, attempt_number, "Call Initiated").await;
                return AttemptOutcome::Calling {
                    subject_id,
                    external_call_id: call.external_call_id,
                };
            }
            Ok(Err(err)) => {
                tracing::warn!(subject = %subject_id, "failed to initiate call: {}", err);
                classify_dispatch_error(&err)
            }
            Err(_) => {
                tracing::error!(subject = %subject_id, "telephony client panicked while placing call");
                FailureReason::Exception
            }
        };

        self.handle_dispatch_failure(&subject_id, reason).await
    }

    async fn handle_dispatch_failure(
        &self,
        subject_id: &SubjectId,
        reason: FailureReason,
    ) -> AttemptOutcome {
        let now = self.now();
        let Some(active) = self.shared.store.remove_active(subject_id) else {
            tracing::warn!(subject = %subject_id, "dispatch failed but attempt already resolved");
            return AttemptOutcome::Superseded {
                subject_id: subject_id.clone(),
            };
        };
        let attempt_number = active.attempt.attempt_number;
        tracing::info!(subject = %subject_id, reason = %reason, "call failed");
        let outcome = self.route_retry(active.attempt, reason, now);
        self.note(subject_id, attempt_number, &format!("Call Failed - {reason}"))
            .await;
        outcome
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Queue a follow-up for a retryable failure, or give up if the budget is spent.
    fn route_retry(
        &self,
        attempt: ScheduledAttempt,
        reason: FailureReason,
        now: NaiveDateTime,
    ) -> AttemptOutcome {
        let subject_id = attempt.subject_id.clone();
        let failed_number = attempt.attempt_number;
        if !reason.is_retryable() {
            return self.fail(subject_id, reason, failed_number, now);
        }

        let next = match self.shared.policy.schedule_retry(
            subject_id.clone(),
            attempt.payload,
            failed_number,
            now,
        ) {
            RetryDecision::Retry(next) => next,
            RetryDecision::Exhausted { attempt_number } => {
                tracing::info!(subject = %subject_id, "max retry attempts reached");
                return self.fail(subject_id, reason, attempt_number, now);
            }
        };

        let due_time = next.due_time;
        let attempt_number = next.attempt_number;
        let pushed = self.shared.queue.lock().push(next);
        match pushed {
            Ok(()) => {
                tracing::info!(
                    subject = %subject_id,
                    due = %due_time,
                    attempt = attempt_number,
                    "retry call scheduled"
                );
                self.audit(
                    &subject_id,
                    AuditAction::RetryScheduled,
                    attempt_number,
                    Some(format!("{reason}; due {due_time}")),
                );
                AttemptOutcome::RetryScheduled {
                    subject_id,
                    attempt_number,
                    due_time,
                }
            }
            Err(SchedulerError::AlreadyQueued(_)) => {
                tracing::warn!(subject = %subject_id, "newer submission already queued, dropping retry");
                AttemptOutcome::Superseded { subject_id }
            }
            Err(err) => {
                tracing::error!(subject = %subject_id, "could not queue retry: {}", err);
                self.fail(subject_id, reason, failed_number, now)
            }
        }
    }

    fn fail(
        &self,
        subject_id: SubjectId,
        reason: FailureReason,
        attempt_number: u32,
        now: NaiveDateTime,
    ) -> AttemptOutcome {
        self.shared
            .store
            .record_failed(subject_id.clone(), reason, attempt_number, now);
        self.audit(
            &subject_id,
            AuditAction::Failed,
            attempt_number,
            Some(reason.to_string()),
        );
        AttemptOutcome::Failed {
            subject_id,
            attempt_number,
            reason,
        }
    }

    fn complete(
        &self,
        subject_id: SubjectId,
        attempt_number: u32,
        status: CallStatus,
        result: serde_json::Value,
        now: NaiveDateTime,
    ) -> AttemptOutcome {
        self.shared.store.record_completed(
            subject_id.clone(),
            attempt_number,
            status.clone(),
            result,
            now,
        );
        self.audit(
            &subject_id,
            AuditAction::Completed,
            attempt_number,
            Some(status.to_string()),
        );
        AttemptOutcome::Completed {
            subject_id,
            attempt_number,
            status,
        }
    }

    // ------------------------------------------------------------------
    // Side channels
    // ------------------------------------------------------------------

    /// Best-effort CRM note. Never fails the caller.
    async fn note(&self, subject_id: &SubjectId, attempt_number: u32, status: &str) {
        let text = format!(
            "Auto-call attempt {attempt_number}: {status} at {}",
            self.now().format("%Y-%m-%dT%H:%M:%S")
        );
        let written = AssertUnwindSafe(self.shared.crm.append_note(subject_id, &text))
            .catch_unwind()
            .await;
        match written {
            Ok(Ok(())) => tracing::debug!(subject = %subject_id, "crm note written"),
            Ok(Err(err)) => {
                tracing::error!(subject = %subject_id, "error updating CRM: {}", err);
            }
            Err(_) => tracing::error!(subject = %subject_id, "crm client panicked while writing note"),
        }
    }

    fn audit(
        &self,
        subject_id: &SubjectId,
        action: AuditAction,
        attempt_number: u32,
        detail: Option<String>,
    ) {
        let event = build_audit_event(subject_id.clone(), action, attempt_number, self.now(), detail);
        let mut audit = self.shared.audit.lock();
        let Some(sink) = audit.as_mut() else {
            return;
        };
        let recorded = std::panic::catch_unwind(AssertUnwindSafe(|| sink.record(event)));
        if recorded.is_err() {
            tracing::error!(subject = %subject_id, action = %action, "audit sink panicked, event dropped");
        }
    }
}
