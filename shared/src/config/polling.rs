//! Polling windows and intervals for verification sessions
//!
//! Number assignment and OTP delivery are independent timeout domains: a stuck
//! number assignment fails within seconds, while SMS delivery is given minutes.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Polling configuration, in whole seconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Delay between number status polls
    #[serde(default = "default_number_poll_interval")]
    pub number_poll_interval_secs: u64,

    /// Wall-clock budget for number assignment
    #[serde(default = "default_number_wait_window")]
    pub number_wait_window_secs: u64,

    /// Delay between SMS inbox polls
    #[serde(default = "default_otp_poll_interval")]
    pub otp_poll_interval_secs: u64,

    /// Wall-clock budget for OTP delivery
    #[serde(default = "default_otp_wait_window")]
    pub otp_wait_window_secs: u64,

    /// Extra pause after a failed SMS inbox poll
    #[serde(default = "default_otp_failure_cooldown")]
    pub otp_failure_cooldown_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            number_poll_interval_secs: default_number_poll_interval(),
            number_wait_window_secs: default_number_wait_window(),
            otp_poll_interval_secs: default_otp_poll_interval(),
            otp_wait_window_secs: default_otp_wait_window(),
            otp_failure_cooldown_secs: default_otp_failure_cooldown(),
        }
    }
}

impl PollingConfig {
    /// Load from process environment, falling back to defaults per field
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str, default: u64| -> Result<u64, String> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| format!("{} must be a whole number of seconds, got '{}'", key, raw)),
                None => Ok(default),
            }
        };

        let config = Self {
            number_poll_interval_secs: read("NUMBER_POLL_INTERVAL_SECS", defaults.number_poll_interval_secs)?,
            number_wait_window_secs: read("NUMBER_WAIT_WINDOW_SECS", defaults.number_wait_window_secs)?,
            otp_poll_interval_secs: read("OTP_POLL_INTERVAL_SECS", defaults.otp_poll_interval_secs)?,
            otp_wait_window_secs: read("OTP_WAIT_WINDOW_SECS", defaults.otp_wait_window_secs)?,
            otp_failure_cooldown_secs: read("OTP_FAILURE_COOLDOWN_SECS", defaults.otp_failure_cooldown_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject windows that could never admit a single poll
    pub fn validate(&self) -> Result<(), String> {
        if self.number_wait_window_secs == 0 {
            return Err("NUMBER_WAIT_WINDOW_SECS must be greater than zero".to_string());
        }
        if self.otp_wait_window_secs == 0 {
            return Err("OTP_WAIT_WINDOW_SECS must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn number_poll_interval(&self) -> Duration {
        Duration::from_secs(self.number_poll_interval_secs)
    }

    pub fn number_wait_window(&self) -> Duration {
        Duration::from_secs(self.number_wait_window_secs)
    }

    pub fn otp_poll_interval(&self) -> Duration {
        Duration::from_secs(self.otp_poll_interval_secs)
    }

    pub fn otp_wait_window(&self) -> Duration {
        Duration::from_secs(self.otp_wait_window_secs)
    }

    pub fn otp_failure_cooldown(&self) -> Duration {
        Duration::from_secs(self.otp_failure_cooldown_secs)
    }
}

fn default_number_poll_interval() -> u64 {
    1
}

fn default_number_wait_window() -> u64 {
    30
}

fn default_otp_poll_interval() -> u64 {
    5
}

fn default_otp_wait_window() -> u64 {
    5 * 60
}

fn default_otp_failure_cooldown() -> u64 {
    5
}
