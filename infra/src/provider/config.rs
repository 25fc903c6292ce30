//! TextVerified client configuration

use std::time::Duration;

use sv_core::services::RetryPolicy;

use crate::InfrastructureError;

/// Public API root used when `TEXTVERIFIED_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://www.textverified.com/api/pub/v2";

/// TextVerified client configuration
#[derive(Clone, PartialEq, Eq)]
pub struct TextVerifiedConfig {
    /// Account API key, sent as `X-API-KEY` during the handshake
    pub api_key: String,
    /// Account username, sent as `X-API-USERNAME` during the handshake
    pub username: String,
    /// API root without trailing slash
    pub base_url: String,
    /// Timeout for each API request in seconds
    pub request_timeout_secs: u64,
    /// Attempts for the handshake and balance reads
    pub max_retries: u32,
    /// Fixed pause between those attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl TextVerifiedConfig {
    pub fn new(api_key: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            username: username.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 15,
            max_retries: 3,
            retry_delay_ms: 3000,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfrastructureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TEXTVERIFIED_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("TEXTVERIFIED_API_KEY not set".to_string()))?;
        let username = lookup("TEXTVERIFIED_USERNAME")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("TEXTVERIFIED_USERNAME not set".to_string()))?;

        let base_url = lookup("TEXTVERIFIED_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(InfrastructureError::Config(
                "TEXTVERIFIED_BASE_URL must be an http(s) URL".to_string(),
            ));
        }

        let config = Self {
            api_key,
            username,
            base_url,
            request_timeout_secs: lookup("PROVIDER_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            max_retries: lookup("PROVIDER_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: lookup("PROVIDER_RETRY_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        };

        if config.request_timeout_secs == 0 {
            return Err(InfrastructureError::Config(
                "PROVIDER_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry policy for the handshake and balance reads
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }
}

impl std::fmt::Debug for TextVerifiedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextVerifiedConfig")
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}
