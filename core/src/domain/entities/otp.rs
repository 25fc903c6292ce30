//! OTP value extracted from free-text SMS bodies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::verification::OtpMessage;

/// Marker shown when a message arrived but carried no usable code
pub const NO_OTP_FOUND: &str = "No OTP found";

// Standalone run of 4 to 8 digits
static OTP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4,8}\b").unwrap());

/// Result of scanning a message for a passcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OtpCode {
    Code(String),
    NotFound,
}

impl OtpCode {
    /// Take the last standalone 4–8 digit run in `text`.
    pub fn extract(text: &str) -> Self {
        OTP_REGEX
            .find_iter(text)
            .last()
            .map(|m| OtpCode::Code(m.as_str().to_string()))
            .unwrap_or(OtpCode::NotFound)
    }

    pub fn from_message(message: &OtpMessage) -> Self {
        Self::extract(&message.raw_text)
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            OtpCode::Code(code) => Some(code),
            OtpCode::NotFound => None,
        }
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpCode::Code(code) => f.write_str(code),
            OtpCode::NotFound => f.write_str(NO_OTP_FOUND),
        }
    }
}
