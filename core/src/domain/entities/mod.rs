//! Domain entities representing core business objects.

pub mod balance;
pub mod credential;
pub mod otp;
pub mod session;
pub mod verification;

// Re-export commonly used types
pub use balance::{Balance, BALANCE_ERROR};
pub use credential::Credential;
pub use otp::{OtpCode, NO_OTP_FOUND};
pub use session::{SessionRecordError, SessionState, VerificationSession};
pub use verification::{
    AssignedNumber, Capability, NumberStatus, OtpMessage, VerificationHandle, VerificationRequest,
};
