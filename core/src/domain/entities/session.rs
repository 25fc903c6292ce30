//! Verification session record and its forward-only state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::balance::Balance;
use super::otp::OtpCode;
use super::verification::{AssignedNumber, VerificationHandle, VerificationRequest};

/// Lifecycle of one verification session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Authenticating,
    Creating,
    AwaitingNumber,
    AwaitingOtp,
    Completed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            SessionState::Authenticating => 0,
            SessionState::Creating => 1,
            SessionState::AwaitingNumber => 2,
            SessionState::AwaitingOtp => 3,
            SessionState::Completed | SessionState::Failed => 4,
        }
    }

    /// Forward by exactly one step, or to `Failed` from any non-terminal state.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            SessionState::Failed => true,
            SessionState::Completed => *self == SessionState::AwaitingOtp,
            _ => next.rank() == self.rank() + 1,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Authenticating => "authenticating",
            SessionState::Creating => "creating",
            SessionState::AwaitingNumber => "awaiting_number",
            SessionState::AwaitingOtp => "awaiting_otp",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Rejected state machine or write-once violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionRecordError {
    #[error("illegal session transition {from} -> {to}")]
    IllegalTransition { from: SessionState, to: SessionState },

    #[error("session already has a verification handle")]
    HandleAlreadySet,

    #[error("session already has an assigned number")]
    NumberAlreadyAssigned,

    #[error("session already has an OTP")]
    OtpAlreadySet,
}

/// Everything one session has learned so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSession {
    /// Local identifier, distinct from the provider's handle id
    pub id: Uuid,
    pub request: VerificationRequest,
    state: SessionState,
    handle: Option<VerificationHandle>,
    number: Option<AssignedNumber>,
    otp: Option<OtpCode>,
    pub balance_before: Option<Balance>,
    pub balance_after: Option<Balance>,
    pub started_at: DateTime<Utc>,
}

impl VerificationSession {
    pub fn new(request: VerificationRequest) -> Self {
        Self::with_id(Uuid::new_v4(), request)
    }

    pub fn with_id(id: Uuid, request: VerificationRequest) -> Self {
        Self {
            id,
            request,
            state: SessionState::Authenticating,
            handle: None,
            number: None,
            otp: None,
            balance_before: None,
            balance_after: None,
            started_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn handle(&self) -> Option<&VerificationHandle> {
        self.handle.as_ref()
    }

    pub fn number(&self) -> Option<&AssignedNumber> {
        self.number.as_ref()
    }

    pub fn otp(&self) -> Option<&OtpCode> {
        self.otp.as_ref()
    }

    pub fn advance(&mut self, next: SessionState) -> Result<(), SessionRecordError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionRecordError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn set_handle(&mut self, handle: VerificationHandle) -> Result<(), SessionRecordError> {
        if self.handle.is_some() {
            return Err(SessionRecordError::HandleAlreadySet);
        }
        self.handle = Some(handle);
        Ok(())
    }

    pub fn assign_number(&mut self, number: AssignedNumber) -> Result<(), SessionRecordError> {
        if self.number.is_some() {
            return Err(SessionRecordError::NumberAlreadyAssigned);
        }
        self.number = Some(number);
        Ok(())
    }

    pub fn set_otp(&mut self, otp: OtpCode) -> Result<(), SessionRecordError> {
        if self.otp.is_some() {
            return Err(SessionRecordError::OtpAlreadySet);
        }
        self.otp = Some(otp);
        Ok(())
    }
}
