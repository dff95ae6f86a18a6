//! In-memory CRM note book.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::Mutex;

use crate::core::{CrmClient, CrmError};
use crate::util::clock::now_local;
use crate::util::serde::SubjectId;

/// One note appended to a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    /// Note text.
    pub text: String,
    /// Local time the note was stored.
    pub created_at: NaiveDateTime,
}

/// Simple in-memory CRM for development/testing.
///
/// Clones share the same note book, so a test can hand one clone to the
/// scheduler and read notes back through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotes {
    notes: Arc<Mutex<HashMap<SubjectId, Vec<NoteEntry>>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryNotes {
    /// Create an empty note book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with [`CrmError::Unavailable`] (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fetch notes for a subject, oldest first, at most `limit`.
    pub fn fetch(&self, subject_id: &SubjectId, limit: usize) -> Vec<NoteEntry> {
        self.notes
            .lock()
            .get(subject_id)
            .map(|notes| notes.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Total notes across all subjects.
    pub fn len(&self) -> usize {
        self.notes.lock().values().map(Vec::len).sum()
    }

    /// Whether no note has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CrmClient for InMemoryNotes {
    async fn append_note(&self, subject_id: &SubjectId, text: &str) -> Result<(), CrmError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CrmError::Unavailable("in-memory notes switched off".into()));
        }
        self.notes
            .lock()
            .entry(subject_id.clone())
            .or_default()
            .push(NoteEntry {
                text: text.to_owned(),
                created_at: now_local(),
            });
        Ok(())
    }
}
