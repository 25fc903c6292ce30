//! Verification service: launches and supervises sessions

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::entities::{Balance, VerificationRequest};
use crate::errors::{SessionError, SessionResult};
use crate::services::balance::BalanceReader;
use crate::services::token::TokenCache;

use super::config::VerificationServiceConfig;
use super::handle::SessionHandle;
use super::session::SessionRunner;
use super::traits::{ProgressReporterTrait, VerificationProviderTrait};
use super::types::SessionSummary;

/// Entry point for verification sessions against one provider.
///
/// The token cache is shared by every session started from the same
/// service; nothing else is shared between sessions.
pub struct VerificationService<P: VerificationProviderTrait> {
    /// Provider client
    provider: Arc<P>,
    /// Process-wide bearer token cache
    tokens: Arc<TokenCache<P>>,
    /// Best-effort balance snapshots
    balances: BalanceReader<P>,
    /// Polling and retry configuration
    config: VerificationServiceConfig,
}

impl<P: VerificationProviderTrait> VerificationService<P> {
    /// Create a service with its own token cache
    pub fn new(provider: Arc<P>, config: VerificationServiceConfig) -> Self {
        let tokens = Arc::new(TokenCache::new(provider.clone(), config.retry));
        Self::with_token_cache(provider, tokens, config)
    }

    /// Create a service that shares an existing token cache
    pub fn with_token_cache(
        provider: Arc<P>,
        tokens: Arc<TokenCache<P>>,
        config: VerificationServiceConfig,
    ) -> Self {
        let balances = BalanceReader::new(provider.clone(), tokens.clone(), config.retry);
        Self {
            provider,
            tokens,
            balances,
            config,
        }
    }

    pub fn token_cache(&self) -> &Arc<TokenCache<P>> {
        &self.tokens
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Validate a user-supplied service name into a request
    pub fn build_request(service_name: &str) -> SessionResult<VerificationRequest> {
        VerificationRequest::sms(service_name).ok_or_else(|| SessionError::InvalidRequest {
            message: "service name must not be blank".to_string(),
        })
    }

    /// Current account balance, `Balance::Unavailable` if it cannot be read
    pub async fn balance(&self) -> Balance {
        self.balances.get_balance().await
    }

    /// Run one session in the caller's task
    pub async fn run(
        &self,
        request: VerificationRequest,
        reporter: &dyn ProgressReporterTrait,
        cancel: &CancellationToken,
    ) -> SessionResult<SessionSummary> {
        self.run_with_id(Uuid::new_v4(), request, reporter, cancel).await
    }

    async fn run_with_id(
        &self,
        id: Uuid,
        request: VerificationRequest,
        reporter: &dyn ProgressReporterTrait,
        cancel: &CancellationToken,
    ) -> SessionResult<SessionSummary> {
        let runner = SessionRunner {
            provider: self.provider.as_ref(),
            tokens: self.tokens.as_ref(),
            balances: &self.balances,
            config: &self.config,
            reporter,
            cancel,
        };
        runner.run(id, request).await
    }
}

impl<P: VerificationProviderTrait + 'static> VerificationService<P> {
    /// Run one session as a background task. The session is cancelled when
    /// the returned handle is dropped.
    pub fn spawn(
        self: &Arc<Self>,
        request: VerificationRequest,
        reporter: Arc<dyn ProgressReporterTrait>,
    ) -> SessionHandle {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();

        let service = Arc::clone(self);
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            service
                .run_with_id(id, request, reporter.as_ref(), &task_cancel)
                .await
        });

        SessionHandle::new(id, cancel, task)
    }
}
