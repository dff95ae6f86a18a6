//! In-memory queue of scheduled attempts with priority and due-time ordering.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use chrono::NaiveDateTime;

use crate::core::{ScheduledAttempt, SchedulerError};
use crate::util::serde::SubjectId;

/// Ordering key: priority rank, then due time, then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueKey {
    rank: u8,
    due_time: NaiveDateTime,
    seq: u64,
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then(self.due_time.cmp(&other.due_time))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Heap entry. Compares on the key only, never on the payload.
struct QueuedAttempt {
    key: QueueKey,
    attempt: ScheduledAttempt,
}

impl PartialEq for QueuedAttempt {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for QueuedAttempt {}

impl PartialOrd for QueuedAttempt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedAttempt {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest key first (reversed for max-heap)
        other.key.cmp(&self.key)
    }
}

/// In-memory queue storing scheduled attempts using a priority heap.
/// This provides O(log n) push and O(log n) removal of the head.
pub struct InMemoryQueue {
    max_depth: usize,
    next_seq: u64,
    /// Binary heap for O(log n) priority-based operations.
    attempts: BinaryHeap<QueuedAttempt>,
    subjects: HashSet<SubjectId>,
}

impl InMemoryQueue {
    /// Create a new in-memory queue with a maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            next_seq: 0,
            attempts: BinaryHeap::with_capacity(max_depth.min(1024)),
            subjects: HashSet::new(),
        }
    }

    /// Enqueue an attempt. A subject may hold at most one pending attempt.
    pub fn push(&mut self, attempt: ScheduledAttempt) -> Result<(), SchedulerError> {
        if self.len() >= self.max_depth {
            return Err(SchedulerError::QueueFull("max queue depth reached".into()));
        }
        if self.subjects.contains(&attempt.subject_id) {
            return Err(SchedulerError::AlreadyQueued(attempt.subject_id));
        }
        let key = QueueKey {
            rank: attempt.priority.rank(),
            due_time: attempt.due_time,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.subjects.insert(attempt.subject_id.clone());
        self.attempts.push(QueuedAttempt { key, attempt });
        Ok(())
    }

    /// Remove and return the head, but only if it is due at `now`.
    pub fn peek_due(&mut self, now: NaiveDateTime) -> Option<ScheduledAttempt> {
        if self.attempts.peek()?.key.due_time > now {
            return None;
        }
        let head = self.attempts.pop()?;
        self.subjects.remove(&head.attempt.subject_id);
        Some(head.attempt)
    }

    /// Whether `subject` has a pending attempt.
    pub fn contains(&self, subject: &SubjectId) -> bool {
        self.subjects.contains(subject)
    }

    /// Pending attempts in dispatch order.
    pub fn pending(&self) -> Vec<ScheduledAttempt> {
        let mut entries: Vec<&QueuedAttempt> = self.attempts.iter().collect();
        entries.sort_by_key(|e| e.key);
        entries.into_iter().map(|e| e.attempt.clone()).collect()
    }

    /// Maximum depth allowed for this queue.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
