//! Verification request, provider handle and number assignment entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability requested from the provider. Only SMS reception is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Sms,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Sms => "sms",
        }
    }
}

/// Caller input for one verification session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Provider service name, e.g. "whatsapp"
    pub service_name: String,
    /// Always `sms`
    pub capability: Capability,
}

impl VerificationRequest {
    /// Build an SMS verification request. Returns `None` for a blank service name.
    pub fn sms(service_name: impl Into<String>) -> Option<Self> {
        let service_name = service_name.into().trim().to_string();
        if service_name.is_empty() {
            return None;
        }
        Some(Self {
            service_name,
            capability: Capability::Sms,
        })
    }
}

/// Provider-assigned identifier plus the link used to poll its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationHandle {
    pub id: String,
    pub status_href: String,
}

/// Raw result of one status poll. Either field may be missing while the
/// provider is still assigning a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberStatus {
    pub number: Option<String>,
    pub ends_at: Option<String>,
}

impl NumberStatus {
    /// Both fields present and the expiry parses as RFC 3339.
    pub fn into_assigned(self) -> Option<AssignedNumber> {
        let number = self.number.filter(|n| !n.trim().is_empty())?;
        let ends_at = self.ends_at?;
        let expires_at = DateTime::parse_from_rfc3339(ends_at.trim())
            .ok()?
            .with_timezone(&Utc);
        Some(AssignedNumber { number, expires_at })
    }
}

/// A phone number leased for the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedNumber {
    pub number: String,
    pub expires_at: DateTime<Utc>,
}

impl AssignedNumber {
    /// Time left on the lease, floored at zero
    pub fn remaining_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        let remaining = self.expires_at - now;
        if remaining < chrono::Duration::zero() {
            chrono::Duration::zero()
        } else {
            remaining
        }
    }

    pub fn remaining(&self) -> chrono::Duration {
        self.remaining_at(Utc::now())
    }
}

/// One SMS received on the assigned number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpMessage {
    pub raw_text: String,
}

impl OtpMessage {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sms_request_rejects_blank_service() {
        assert!(VerificationRequest::sms("   ").is_none());

        let request = VerificationRequest::sms(" whatsapp ").unwrap();
        assert_eq!(request.service_name, "whatsapp");
        assert_eq!(request.capability, Capability::Sms);
    }

    #[test]
    fn test_request_serializes_provider_shape() {
        let request = VerificationRequest::sms("telegram").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"serviceName": "telegram", "capability": "sms"}));
    }

    #[test]
    fn test_status_requires_both_fields() {
        let number_only = NumberStatus {
            number: Some("+15551234567".to_string()),
            ends_at: None,
        };
        assert!(number_only.into_assigned().is_none());

        let expiry_only = NumberStatus {
            number: None,
            ends_at: Some("2024-01-01T00:00:10Z".to_string()),
        };
        assert!(expiry_only.into_assigned().is_none());

        let complete = NumberStatus {
            number: Some("+15551234567".to_string()),
            ends_at: Some("2024-01-01T00:00:10Z".to_string()),
        };
        let assigned = complete.into_assigned().unwrap();
        assert_eq!(assigned.number, "+15551234567");
        assert_eq!(assigned.expires_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 10).unwrap());
    }

    #[test]
    fn test_status_with_unparseable_expiry_is_incomplete() {
        let status = NumberStatus {
            number: Some("+15551234567".to_string()),
            ends_at: Some("tomorrow-ish".to_string()),
        };
        assert!(status.into_assigned().is_none());
    }

    #[test]
    fn test_expiry_with_offset_is_normalized_to_utc() {
        let status = NumberStatus {
            number: Some("5551234567".to_string()),
            ends_at: Some("2024-01-01T02:00:00+02:00".to_string()),
        };
        let assigned = status.into_assigned().unwrap();
        assert_eq!(assigned.expires_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_remaining_is_floored_at_zero() {
        let assigned = AssignedNumber {
            number: "+15551234567".to_string(),
            expires_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 10).unwrap(),
        };
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 4).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap();
        assert_eq!(assigned.remaining_at(before).num_seconds(), 6);
        assert_eq!(assigned.remaining_at(after), chrono::Duration::zero());
    }
}
