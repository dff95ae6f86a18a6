//! Configuration models: defaults, validation, JSON and environment loading.

pub mod scheduler;

pub use scheduler::{load_env_config, SchedulerConfig};
