//! Bearer credential issued by the provider handshake.

use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque bearer token. Not expiry-tracked: it stays valid until a call is
/// rejected and the cache is invalidated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    obtained_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            obtained_at: Utc::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }
}

// Tokens never reach logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}
