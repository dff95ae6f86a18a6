//! Infrastructure adapters for the queue and the external collaborators.

pub mod notes;
pub mod queue;
pub mod telephony;

pub use notes::InMemoryNotes;
pub use queue::InMemoryQueue;
pub use telephony::DryRunTelephony;
