//! Type definitions shared by the HTTP host and its clients
//!
//! - `response` - API response wrappers and health checks

pub mod response;

// Re-export commonly used types at module level
pub use response::{ApiResponse, HealthResponse, HealthStatus};
