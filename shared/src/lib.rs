//! Shared utilities and common types for the SmsVerify workspace
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response structures
//! - Utility functions (phone masking, etc.)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, LogFormat, LoggingConfig, PollingConfig, ServerConfig,
};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
pub use utils::phone;
