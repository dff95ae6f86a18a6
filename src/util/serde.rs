//! Serializable identifiers and scheduling classes shared across modules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of the lead/contact being called.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Dispatch class of an attempt. Lower rank is dispatched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// First attempt for a freshly submitted lead.
    NewLead,
    /// Follow-up attempt after a retryable failure.
    Retry,
}

impl Priority {
    /// Numeric rank used for queue ordering (1 = new lead, 2 = retry).
    pub const fn rank(self) -> u8 {
        match self {
            Self::NewLead => 1,
            Self::Retry => 2,
        }
    }
}
