//! Balance reader implementation

use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::Balance;
use crate::errors::{AuthError, ProviderCallError};
use crate::services::retry::RetryPolicy;
use crate::services::token::TokenCache;
use crate::services::verification::VerificationProviderTrait;

/// Why one balance attempt failed
#[derive(Debug, Error)]
enum BalanceAttemptError {
    /// No token could be obtained; not retried
    #[error(transparent)]
    Token(AuthError),
    #[error(transparent)]
    Provider(ProviderCallError),
}

/// Reads the account balance with the shared retry policy
pub struct BalanceReader<P: VerificationProviderTrait> {
    provider: Arc<P>,
    tokens: Arc<TokenCache<P>>,
    retry: RetryPolicy,
}

impl<P: VerificationProviderTrait> BalanceReader<P> {
    pub fn new(provider: Arc<P>, tokens: Arc<TokenCache<P>>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            tokens,
            retry,
        }
    }

    /// Current balance, or `Balance::Unavailable` when it cannot be read.
    ///
    /// A rejected token is dropped from the cache so the next attempt
    /// re-authenticates. If that re-authentication fails the read stops
    /// there; if no token can be obtained up front the provider is never
    /// called.
    pub async fn get_balance(&self) -> Balance {
        if let Err(err) = self.tokens.get_token().await {
            tracing::warn!(
                event = "balance_unavailable",
                error = %err,
                "Skipping balance read, no provider token"
            );
            return Balance::Unavailable;
        }

        let result = self
            .retry
            .run_while(
                "account_balance",
                |err: &BalanceAttemptError| !matches!(err, BalanceAttemptError::Token(_)),
                move |_| async move {
                    let credential = match self.tokens.get_token().await {
                        Ok(credential) => credential,
                        Err(err) => return Err(BalanceAttemptError::Token(err)),
                    };

                    match self.provider.account_balance(credential.token()).await {
                        Ok(amount) => Ok(amount),
                        Err(err) => {
                            if err.is_unauthorized() {
                                self.tokens.invalidate(&credential).await;
                            }
                            Err(BalanceAttemptError::Provider(err))
                        }
                    }
                },
            )
            .await;

        match result {
            Ok(amount) => {
                tracing::debug!(event = "balance_read", amount, "Read account balance");
                Balance::Amount(amount)
            }
            Err(exhausted) => {
                tracing::warn!(
                    event = "balance_unavailable",
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Failed to read account balance"
                );
                Balance::Unavailable
            }
        }
    }
}
