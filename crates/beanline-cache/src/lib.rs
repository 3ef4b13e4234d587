//! Payload cache for the content sync engine.
//!
//! This crate provides:
//! - `CacheEntry` - A validated payload and when it was fetched
//! - `ContentCache` - Endpoint-keyed store; staleness is judged on read
//! - `CacheStatus` - Outcome of a cache lookup
//!
//! Entries never expire on their own. A read with a maximum age reports
//! `Hit` or `Stale`, and stale entries stay available as a fallback until
//! they are cleared or overwritten.

mod entry;
mod status;
mod store;

pub use entry::*;
pub use status::*;
pub use store::*;
