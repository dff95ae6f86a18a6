//! CRM note backends.

pub mod memory;

pub use memory::{InMemoryNotes, NoteEntry};
