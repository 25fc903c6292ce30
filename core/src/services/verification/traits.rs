//! Traits for provider and progress reporter integration

use async_trait::async_trait;

use crate::domain::entities::{NumberStatus, OtpMessage, VerificationHandle, VerificationRequest};
use crate::errors::ProviderCallError;

use super::types::SessionEvent;

/// Identity handshake with the provider
#[async_trait]
pub trait AuthenticatorTrait: Send + Sync {
    /// Exchange the configured identity for a bearer token. Single attempt.
    async fn authenticate(&self) -> Result<String, ProviderCallError>;
}

/// Authenticated provider operations. Every method is a single attempt;
/// retry and polling policy belong to the caller.
#[async_trait]
pub trait VerificationProviderTrait: AuthenticatorTrait {
    /// Current account balance
    async fn account_balance(&self, token: &str) -> Result<f64, ProviderCallError>;

    /// Open a verification and return its handle
    async fn create_verification(
        &self,
        token: &str,
        request: &VerificationRequest,
    ) -> Result<VerificationHandle, ProviderCallError>;

    /// Fetch the number assignment status behind `handle.status_href`
    async fn verification_status(
        &self,
        token: &str,
        handle: &VerificationHandle,
    ) -> Result<NumberStatus, ProviderCallError>;

    /// Messages received for the verification, oldest first
    async fn sms_messages(
        &self,
        token: &str,
        verification_id: &str,
    ) -> Result<Vec<OtpMessage>, ProviderCallError>;
}

/// Receiver of phase events for one session
#[async_trait]
pub trait ProgressReporterTrait: Send + Sync {
    async fn report(&self, event: SessionEvent);
}
