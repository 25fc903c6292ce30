use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sv_core::domain::entities::Balance;
use sv_core::errors::FailureReason;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartVerificationRequest {
    /// Provider service name, e.g. "whatsapp" or "telegram"
    #[validate(length(min = 1, max = 64))]
    pub service_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartVerificationResponse {
    pub session_id: Uuid,
    pub service_name: String,
}

/// Coarse session status as seen by API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Running, no number yet
    Started,
    /// Number assigned, waiting for the SMS
    Pending,
    Completed,
    Failed,
}

/// Latest known state of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub service_name: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Seconds until the number expires, never negative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_before: Option<Balance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<Balance>,
    /// Extracted code, or "No OTP found"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Amount, or "Error" when it could not be read
    pub balance: Balance,
    /// Two-decimal rendering for display
    pub display: String,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            display: balance.to_string(),
            balance,
        }
    }
}
