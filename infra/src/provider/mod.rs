//! Verification provider integrations

mod config;
mod models;
mod textverified;

pub use config::TextVerifiedConfig;
pub use textverified::TextVerifiedClient;
