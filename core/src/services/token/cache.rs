//! Token cache implementation

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::Credential;
use crate::errors::{AuthError, ProviderCallError};
use crate::services::retry::RetryPolicy;
use crate::services::verification::AuthenticatorTrait;

/// Process-wide holder of the provider bearer token
pub struct TokenCache<A: AuthenticatorTrait> {
    /// Performs the identity handshake
    authenticator: Arc<A>,
    /// Retry policy for the handshake
    retry: RetryPolicy,
    /// Current credential, `None` until fetched or after invalidation
    cached: RwLock<Option<Credential>>,
    /// Serializes refreshes
    refresh: Mutex<()>,
}

impl<A: AuthenticatorTrait> TokenCache<A> {
    pub fn new(authenticator: Arc<A>, retry: RetryPolicy) -> Self {
        Self {
            authenticator,
            retry,
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Return the cached credential, or run the handshake if there is none.
    ///
    /// Callers arriving while a refresh is in flight wait for it and reuse
    /// its result instead of starting their own handshake.
    pub async fn get_token(&self) -> Result<Credential, AuthError> {
        if let Some(credential) = self.cached.read().await.clone() {
            return Ok(credential);
        }

        let _refresh = self.refresh.lock().await;

        if let Some(credential) = self.cached.read().await.clone() {
            tracing::debug!(event = "token_reused", "Reusing token refreshed by a concurrent caller");
            return Ok(credential);
        }

        tracing::info!(event = "token_refresh", "Authenticating with verification provider");

        let token = self
            .retry
            .run("authenticate", move |_| async move {
                let token = self.authenticator.authenticate().await?;
                if token.trim().is_empty() {
                    return Err(ProviderCallError::Malformed {
                        reason: "empty token".to_string(),
                        body: String::new(),
                    });
                }
                Ok::<_, ProviderCallError>(token)
            })
            .await
            .map_err(|exhausted| {
                tracing::error!(
                    event = "token_refresh_failed",
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Failed to authenticate with verification provider"
                );
                AuthError {
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error,
                }
            })?;

        let credential = Credential::new(token);
        *self.cached.write().await = Some(credential.clone());

        tracing::info!(event = "token_refreshed", "Obtained provider bearer token");
        Ok(credential)
    }

    /// Drop `rejected` from the cache so the next `get_token` re-authenticates.
    /// Called by every consumer that sees an authorization-rejected response.
    /// A newer token already installed by another caller is left alone.
    pub async fn invalidate(&self, rejected: &Credential) {
        let mut cached = self.cached.write().await;
        match cached.as_ref() {
            Some(current) if current.token() == rejected.token() => {
                *cached = None;
                tracing::info!(event = "token_invalidated", "Provider rejected bearer token, cache cleared");
            }
            Some(_) => {
                tracing::debug!(event = "token_already_refreshed", "Rejected token was already replaced");
            }
            None => {}
        }
    }

    /// Whether a credential is currently cached
    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }
}
