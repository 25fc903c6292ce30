//! Request and response bodies

pub mod verification;

pub use verification::{
    BalanceResponse, SessionStatus, SessionView, StartVerificationRequest,
    StartVerificationResponse,
};
