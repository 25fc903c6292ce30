//! Configuration for the verification service

use std::time::Duration;

use sv_shared::config::PollingConfig;

use crate::services::retry::RetryPolicy;

/// Configuration for the verification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationServiceConfig {
    /// Delay between number status polls
    pub number_poll_interval: Duration,
    /// Wall-clock budget for number assignment
    pub number_wait_window: Duration,
    /// Delay between SMS inbox polls, applied every iteration
    pub otp_poll_interval: Duration,
    /// Wall-clock budget for OTP delivery
    pub otp_wait_window: Duration,
    /// Extra pause after a failed inbox poll
    pub otp_failure_cooldown: Duration,
    /// Policy for the token handshake and balance reads
    pub retry: RetryPolicy,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from_polling(&PollingConfig::default(), RetryPolicy::default())
    }
}

impl VerificationServiceConfig {
    pub fn from_polling(polling: &PollingConfig, retry: RetryPolicy) -> Self {
        Self {
            number_poll_interval: polling.number_poll_interval(),
            number_wait_window: polling.number_wait_window(),
            otp_poll_interval: polling.otp_poll_interval(),
            otp_wait_window: polling.otp_wait_window(),
            otp_failure_cooldown: polling.otp_failure_cooldown(),
            retry,
        }
    }
}
