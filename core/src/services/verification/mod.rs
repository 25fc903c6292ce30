//! Verification sessions against a disposable-number provider
//!
//! A session authenticates, opens a verification, waits for a number to be
//! assigned and then waits for an SMS to arrive on it, reporting progress to
//! a caller-supplied reporter along the way.

mod config;
mod handle;
mod service;
mod session;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use handle::SessionHandle;
pub use service::VerificationService;
pub use traits::{AuthenticatorTrait, ProgressReporterTrait, VerificationProviderTrait};
pub use types::{SessionEvent, SessionSummary};
