//! # Infrastructure Layer
//!
//! Concrete implementations of the core's provider seam.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **HTTP**: a thin reqwest wrapper with per-call timeouts and
//!   status classification
//! - **Provider**: the TextVerified client implementing
//!   `VerificationProviderTrait`

/// HTTP client wrapper
pub mod http;

/// Verification provider integrations
pub mod provider;

pub use http::{HttpClient, HttpError, HttpResponse};
pub use provider::{TextVerifiedClient, TextVerifiedConfig};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
