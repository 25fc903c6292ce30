//! Error handling for route handlers

pub mod error;

pub use error::ApiError;
