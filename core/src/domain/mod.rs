//! Domain layer containing verification entities and value objects.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
