//! Business services containing domain logic and use cases.

pub mod balance;
pub mod retry;
pub mod token;
pub mod verification;

#[cfg(test)]
pub(crate) mod mocks;

// Re-export commonly used types
pub use balance::BalanceReader;
pub use retry::{RetryExhausted, RetryPolicy};
pub use token::TokenCache;
pub use verification::{
    AuthenticatorTrait, ProgressReporterTrait, SessionEvent, SessionHandle, SessionSummary,
    VerificationProviderTrait, VerificationService, VerificationServiceConfig,
};
