//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, FailureReason, ProviderCallError};

use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::SessionRecordError;

/// Phase that ran out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    Number,
    Otp,
}

impl std::fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitPhase::Number => write!(f, "number"),
            WaitPhase::Otp => write!(f, "OTP"),
        }
    }
}

/// Session-level errors. Each one ends the session; transient network
/// failures are absorbed inside the polling loops and never reach this type.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid verification request: {message}")]
    InvalidRequest { message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Verification request failed: {message}")]
    Provider {
        message: String,
        /// Raw provider response, kept for diagnostics
        payload: Option<String>,
    },

    #[error("{phase} not received within {}s. Try again.", .window.as_secs())]
    Timeout { phase: WaitPhase, window: Duration },

    #[error("Session cancelled")]
    Cancelled,

    #[error(transparent)]
    Record(#[from] SessionRecordError),
}

impl SessionError {
    /// Classification surfaced to the progress reporter
    pub fn reason(&self) -> FailureReason {
        match self {
            SessionError::InvalidRequest { .. } => FailureReason::InvalidRequest,
            SessionError::Auth(_) => FailureReason::Auth,
            SessionError::Provider { .. } => FailureReason::Provider,
            SessionError::Timeout { .. } => FailureReason::Timeout,
            SessionError::Cancelled => FailureReason::Cancelled,
            SessionError::Record(_) => FailureReason::Internal,
        }
    }

    /// Diagnostic text for the `Failed` event
    pub fn detail(&self) -> String {
        match self {
            SessionError::Provider {
                message,
                payload: Some(payload),
            } => format!("{}. Response: {}", message, payload),
            other => other.to_string(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_is_user_facing() {
        let err = SessionError::Timeout {
            phase: WaitPhase::Number,
            window: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "number not received within 30s. Try again.");
        assert_eq!(err.reason(), FailureReason::Timeout);
    }

    #[test]
    fn test_provider_detail_includes_payload() {
        let err = SessionError::Provider {
            message: "missing href".to_string(),
            payload: Some("{\"id\":\"R1\"}".to_string()),
        };
        assert_eq!(err.reason(), FailureReason::Provider);
        assert!(err.detail().contains("{\"id\":\"R1\"}"));
    }

    #[test]
    fn test_auth_error_reports_attempts() {
        let err = SessionError::from(AuthError {
            attempts: 3,
            last_error: ProviderCallError::Network("connection refused".to_string()),
        });
        assert!(err.to_string().contains("after 3 attempts"));
        assert_eq!(err.reason(), FailureReason::Auth);
    }
}
