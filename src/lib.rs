//! # Call Scheduler
//!
//! A windowed call scheduling and retry engine for outbound lead calls.
//!
//! New leads are queued with a short delay (or deferred to the next opening of
//! the calling window). A single loop task drains the queue in priority order,
//! never dispatching outside business hours and never exceeding a concurrency
//! ceiling. Call outcomes arrive asynchronously from the telephony vendor and
//! are classified into success, retryable failure or permanent failure;
//! retries are bounded and always land inside the window.
//!
//! ## Key Features
//!
//! - **Calling window**: `[start_hour, end_hour)` in local wall-clock time
//! - **Priority queue**: new leads before retries, earliest due first, FIFO on ties
//! - **Bounded retries**: `no-answer`, `busy` and dispatch failures retry up to `max_attempts`
//! - **Concurrency ceiling**: at most `max_concurrent_calls` calls in flight
//! - **Pluggable collaborators**: telephony and CRM behind `async_trait` ports
//! - **Audit trail**: optional bounded log of every transition
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use call_scheduler::builders::build_scheduler;
//! use call_scheduler::config::SchedulerConfig;
//! use call_scheduler::core::ContactPayload;
//! use call_scheduler::infra::{DryRunTelephony, InMemoryNotes};
//! use call_scheduler::util::{init_tracing, SystemClock};
//!
//! init_tracing();
//! let cfg = SchedulerConfig::from_env()?;
//! let scheduler = build_scheduler(&cfg, DryRunTelephony::new(), InMemoryNotes::new(), Arc::new(SystemClock))?;
//! scheduler.start();
//!
//! scheduler.submit_new("lead-42".into(), ContactPayload::with_phone("03001234567"))?;
//!
//! // from the vendor status webhook
//! scheduler.report_completion("lead-42".into(), "no-answer", serde_json::json!({})).await;
//!
//! scheduler.stop().await;
//! ```
//!
//! For complete flows, see `tests/scheduler_flow_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: window, queue ordering, retries, dispatch.
pub mod core;
/// Configuration models, defaults and environment loading.
pub mod config;
/// Builders to construct a scheduler from configuration.
pub mod builders;
/// Infrastructure adapters: queue, CRM notes and dry-run telephony.
pub mod infra;
/// API surface for the management layer.
pub mod runtime;
/// Shared utilities.
pub mod util;
