//! API surface for the management layer.

pub mod api;

pub use api::{
    health, report_call_status, submit_lead, CallStatusReport, Health, LeadAccepted,
    LeadSubmission,
};
