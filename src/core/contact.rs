//! Contact data carried by an attempt.

use serde::{Deserialize, Serialize};

/// Lead contact details needed to dispatch a call.
///
/// Accepts both snake_case keys and the CRM's `Phone` / `First_Name` /
/// `Last_Name` / `Email` spellings. Unknown fields are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    /// Raw phone number as supplied by the lead source.
    #[serde(default, alias = "Phone")]
    pub phone: Option<String>,
    /// Given name.
    #[serde(default, alias = "First_Name")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, alias = "Last_Name")]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    /// Any other lead fields.
    #[serde(default, flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContactPayload {
    /// Payload with only a phone number.
    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    /// Set the name fields.
    #[must_use]
    pub fn named(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Dialable address, or `None` when the payload has no usable phone.
    pub fn contact_address(&self) -> Option<String> {
        self.phone.as_deref().and_then(normalize_phone)
    }

    /// "First Last", trimmed. Empty when no name is known.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }
}

/// Normalize a phone number to a `+`-prefixed dial string.
///
/// Keeps digits and `+`. Bare numbers get a country prefix:
/// - `91` + 12 digits: already Indian, just add `+`
/// - `03` + 11 digits, or any 11 digits starting with `0`: Pakistani, `+92` replaces the `0`
/// - 10 digits: Indian mobile, `+91`
/// - otherwise `+` is prepended as-is
///
/// Returns `None` when nothing dialable remains.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if cleaned.starts_with('+') {
        return Some(cleaned);
    }

    let normalized = match cleaned.len() {
        12 if cleaned.starts_with("91") => format!("+{cleaned}"),
        11 if cleaned.starts_with('0') => format!("+92{}", &cleaned[1..]),
        10 => format!("+91{cleaned}"),
        _ => format!("+{cleaned}"),
    };
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_prefixes() {
        assert_eq!(normalize_phone("+1 (555) 010-2000").as_deref(), Some("+15550102000"));
        assert_eq!(normalize_phone("919876543210").as_deref(), Some("+919876543210"));
        assert_eq!(normalize_phone("03001234567").as_deref(), Some("+923001234567"));
        assert_eq!(normalize_phone("9876543210").as_deref(), Some("+919876543210"));
        assert_eq!(normalize_phone("05001234567").as_deref(), Some("+925001234567"));
        assert_eq!(normalize_phone("4412345").as_deref(), Some("+4412345"));
    }

    #[test]
    fn test_normalize_phone_rejects_empty() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("  -- "), None);
        assert_eq!(normalize_phone("+"), None);
    }

    #[test]
    fn test_payload_accepts_crm_field_names() {
        let payload: ContactPayload = serde_json::from_value(serde_json::json!({
            "Phone": "9876543210",
            "First_Name": "Asha",
            "Last_Name": "Rao",
            "Company": "Acme"
        }))
        .unwrap();

        assert_eq!(payload.contact_address().as_deref(), Some("+919876543210"));
        assert_eq!(payload.display_name(), "Asha Rao");
        assert_eq!(payload.extra.get("Company"), Some(&serde_json::json!("Acme")));
    }

    #[test]
    fn test_missing_phone_has_no_address() {
        let payload = ContactPayload::default().named("No", "Phone");
        assert!(payload.contact_address().is_none());

        let blank = ContactPayload::with_phone("   ");
        assert!(blank.contact_address().is_none());
    }

    #[test]
    fn test_display_name_trims_missing_parts() {
        let mut payload = ContactPayload::with_phone("+1");
        payload.first_name = Some("Solo".into());
        assert_eq!(payload.display_name(), "Solo");
        assert_eq!(ContactPayload::default().display_name(), "");
    }
}
