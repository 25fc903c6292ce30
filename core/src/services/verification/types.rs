//! Types for verification session events and results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AssignedNumber, Balance, OtpCode, VerificationHandle};
use crate::errors::FailureReason;

/// Phase event delivered to the progress reporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Number assigned, OTP polling about to start
    Pending {
        service_name: String,
        number: AssignedNumber,
        balance_before: Balance,
        balance_after: Balance,
    },
    /// A message arrived; `otp` may be the not-found marker
    Completed {
        service_name: String,
        number: AssignedNumber,
        balance: Balance,
        otp: OtpCode,
    },
    Failed {
        reason: FailureReason,
        detail: String,
    },
}

impl SessionEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionEvent::Pending { .. })
    }
}

/// Final record of a completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub service_name: String,
    pub handle: VerificationHandle,
    pub number: AssignedNumber,
    pub otp: OtpCode,
    pub balance_before: Balance,
    pub balance_after: Balance,
}
