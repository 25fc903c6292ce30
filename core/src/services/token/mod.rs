//! Bearer token cache for the provider API
//!
//! A single credential is shared by every session in the process. It is
//! fetched on first use, reused until a call is rejected, and refreshed by
//! at most one caller at a time.

mod cache;


pub use cache::TokenCache;
