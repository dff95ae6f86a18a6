//! Telephony client that logs calls instead of dialing.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{CallRequest, PlacedCall, TelephonyClient, TelephonyError};

/// Accepts every call, records it, and returns a fresh call id in `queued` state.
#[derive(Debug, Clone, Default)]
pub struct DryRunTelephony {
    placed: Arc<Mutex<Vec<CallRequest>>>,
}

impl DryRunTelephony {
    /// Create a client with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order.
    pub fn placed(&self) -> Vec<CallRequest> {
        self.placed.lock().clone()
    }
}

#[async_trait]
impl TelephonyClient for DryRunTelephony {
    async fn place_call(&self, request: CallRequest) -> Result<PlacedCall, TelephonyError> {
        let external_call_id = format!("dry-{}", uuid::Uuid::new_v4().simple());
        tracing::info!(
            subject = %request.subject_id,
            to = %request.address,
            call_id = %external_call_id,
            "dry run: call not placed"
        );
        self.placed.lock().push(request);
        Ok(PlacedCall {
            external_call_id,
            status: "queued".into(),
        })
    }
}
