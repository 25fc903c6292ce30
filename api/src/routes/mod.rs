//! Route handlers
//!
//! - Health check
//! - Verification sessions (start, status, cancel)
//! - Account balance

pub mod balance;
pub mod health;
pub mod verifications;

use std::sync::Arc;
use std::time::Duration;

use sv_core::services::{VerificationProviderTrait, VerificationService};

use crate::registry::SessionRegistry;

/// Application state that holds shared services
pub struct AppState<P: VerificationProviderTrait> {
    pub verification_service: Arc<VerificationService<P>>,
    pub sessions: Arc<SessionRegistry>,
}

impl<P: VerificationProviderTrait> AppState<P> {
    pub fn new(verification_service: Arc<VerificationService<P>>) -> Self {
        Self {
            verification_service,
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    /// State whose registry keeps finished sessions for `retention`
    pub fn with_session_retention(
        verification_service: Arc<VerificationService<P>>,
        retention: Duration,
    ) -> Self {
        Self {
            verification_service,
            sessions: Arc::new(SessionRegistry::with_retention(retention)),
        }
    }
}
