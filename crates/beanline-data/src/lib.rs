//! Data access layer for the content sync engine.
//!
//! This crate provides:
//! - `Transport` - Async GET abstraction the engine fetches through
//! - `HttpTransport` - `reqwest` backed transport
//! - `Response` - Status, headers and body of a completed request
//! - `RetryPolicy` - Attempt count and linear backoff
//! - `FetchError` - Failure taxonomy for a single attempt

mod client;
mod error;
mod response;
mod retry;

pub use client::*;
pub use error::*;
pub use response::*;
pub use retry::*;
