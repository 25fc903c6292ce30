//! HTTP client wrapper
//!
//! One request per call with an explicit timeout. Non-2xx responses are
//! errors carrying the raw body; retrying is left to the caller.

mod client;

pub use client::{HttpClient, HttpError, HttpResponse};
