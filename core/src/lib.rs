//! # SmsVerify Core
//!
//! Domain layer for disposable-number SMS verification.
//! This crate contains the session entities, the provider seam, the token
//! cache, balance reader and the verification session state machine.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{Balance, VerificationRequest};
pub use errors::{AuthError, FailureReason, ProviderCallError, SessionError, SessionResult};
pub use services::{
    AuthenticatorTrait, ProgressReporterTrait, SessionEvent, SessionHandle, SessionSummary,
    VerificationProviderTrait, VerificationService, VerificationServiceConfig,
};
