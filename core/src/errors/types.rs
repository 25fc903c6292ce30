//! Error types shared across the provider seam
//!
//! `ProviderCallError` is what a single provider call can fail with; the
//! session decides whether that is retried, swallowed or escalated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of one provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderCallError {
    /// Transport-level failure or timeout; no response was received
    #[error("network failure: {0}")]
    Network(String),

    /// The bearer token (or identity headers) were rejected
    #[error("authorization rejected (status {status})")]
    Unauthorized { status: u16, body: String },

    /// Any other non-2xx response
    #[error("provider returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// 2xx response whose body did not have the expected shape
    #[error("malformed provider response ({reason}): {body}")]
    Malformed { reason: String, body: String },
}

impl ProviderCallError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProviderCallError::Unauthorized { .. })
    }

    /// Raw response body, if one was received
    pub fn payload(&self) -> Option<&str> {
        match self {
            ProviderCallError::Network(_) => None,
            ProviderCallError::Unauthorized { body, .. }
            | ProviderCallError::Rejected { body, .. }
            | ProviderCallError::Malformed { body, .. } => Some(body),
        }
    }
}

/// Token handshake exhausted its retry budget
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to authenticate with the provider after {attempts} attempts: {last_error}")]
pub struct AuthError {
    pub attempts: u32,
    pub last_error: ProviderCallError,
}

/// Why a session failed, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidRequest,
    Auth,
    Provider,
    Timeout,
    Cancelled,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_kept_for_http_failures() {
        let err = ProviderCallError::Rejected {
            status: 422,
            body: "{\"error\":\"unknown service\"}".to_string(),
        };
        assert_eq!(err.payload(), Some("{\"error\":\"unknown service\"}"));
        assert!(ProviderCallError::Network("timeout".to_string()).payload().is_none());
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ProviderCallError::Unauthorized {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert!(!ProviderCallError::Network("reset".to_string()).is_unauthorized());
    }
}
