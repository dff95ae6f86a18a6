//! Collaborator ports: the telephony vendor and the CRM.
//!
//! Both are injected into the scheduler at construction. Neither is called
//! while a scheduler lock is held.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::{CrmError, TelephonyError};
use crate::util::serde::SubjectId;

/// Everything the telephony vendor needs to place one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Normalized dial string.
    pub address: String,
    /// Lead being called, echoed back in vendor callbacks.
    pub subject_id: SubjectId,
    /// Human-readable name; may be empty.
    pub display_name: String,
}

/// A call the vendor accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedCall {
    /// Vendor-assigned call identifier.
    pub external_call_id: String,
    /// Vendor status at creation time (e.g. `queued`).
    pub status: String,
}

/// Abstraction for the vendor that actually dials.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use call_scheduler::core::{CallRequest, PlacedCall, TelephonyClient, TelephonyError};
///
/// struct VendorClient { /* http client, credentials */ }
///
/// #[async_trait]
/// impl TelephonyClient for VendorClient {
///     async fn place_call(&self, request: CallRequest) -> Result<PlacedCall, TelephonyError> {
///         // POST to the vendor, map the response
///         # unimplemented!()
///     }
/// }
/// ```
#[async_trait]
pub trait TelephonyClient: Send + Sync + 'static {
    /// Place a call. Errors are classified by the scheduler into retryable
    /// dispatch failures.
    async fn place_call(&self, request: CallRequest) -> Result<PlacedCall, TelephonyError>;
}

/// Abstraction for the CRM that keeps the durable history of each lead.
///
/// Writes are best-effort: the scheduler logs failures and moves on.
#[async_trait]
pub trait CrmClient: Send + Sync + 'static {
    /// Append a free-text note to the lead's record.
    async fn append_note(&self, subject_id: &SubjectId, text: &str) -> Result<(), CrmError>;
}
