//! API-facing request/response models.
//!
//! The HTTP layer itself lives outside this crate; these are the shapes it
//! deserializes into and the thin functions it calls.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::{
    AttemptOutcome, CallScheduler, CallStatus, ContactPayload, CrmClient, QueueStatus,
    TelephonyClient,
};
use crate::util::serde::SubjectId;

/// New-lead submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSubmission {
    /// Lead identifier.
    #[serde(alias = "lead_id", alias = "id")]
    pub subject_id: SubjectId,
    /// Contact data.
    #[serde(default)]
    pub payload: ContactPayload,
}

/// Acceptance response for a submitted lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadAccepted {
    /// Lead identifier.
    pub subject_id: SubjectId,
    /// When the first call becomes due.
    pub due_time: NaiveDateTime,
    /// Attempt number queued.
    pub attempt_number: u32,
}

/// Call-status callback from the telephony vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStatusReport {
    /// Lead the call was for.
    #[serde(alias = "lead_id")]
    pub subject_id: SubjectId,
    /// Final call status (`completed`, `no-answer`, `busy`, ...).
    #[serde(alias = "CallStatus")]
    pub status: CallStatus,
    /// Vendor call identifier, if sent.
    #[serde(default, alias = "CallSid")]
    pub call_id: Option<String>,
    /// Anything else the vendor sent.
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Scheduler counters.
    pub status: QueueStatus,
}

/// Submit a new lead. Rejections are returned as a message for the caller.
pub fn submit_lead<T, C>(
    scheduler: &CallScheduler<T, C>,
    req: LeadSubmission,
) -> Result<LeadAccepted, String>
where
    T: TelephonyClient,
    C: CrmClient,
{
    scheduler
        .submit_new(req.subject_id, req.payload)
        .map(|attempt| LeadAccepted {
            subject_id: attempt.subject_id,
            due_time: attempt.due_time,
            attempt_number: attempt.attempt_number,
        })
        .map_err(|e| e.to_string())
}

/// Forward a vendor status callback to the scheduler.
pub async fn report_call_status<T, C>(
    scheduler: &CallScheduler<T, C>,
    report: CallStatusReport,
) -> AttemptOutcome
where
    T: TelephonyClient,
    C: CrmClient,
{
    if let Some(call_id) = &report.call_id {
        tracing::debug!(subject = %report.subject_id, call_id = %call_id, "status callback");
    }
    scheduler
        .report_completion(report.subject_id, report.status, report.result)
        .await
}

/// Return a health payload. Healthy while the loop runs.
pub fn health<T, C>(scheduler: &CallScheduler<T, C>) -> Health
where
    T: TelephonyClient,
    C: CrmClient,
{
    let status = scheduler.queue_status();
    Health {
        ok: status.running,
        status,
    }
}
