//! Core abstractions for the beanline content sync engine.
//!
//! This crate provides the fundamental types:
//! - `EngineConfig` - Engine configuration with loader and validation
//! - `ContentDomain` - The four content domains and their endpoints
//! - `RefreshSchedule` - Per-domain refresh cadence and cache usage
//! - `EngineEvent` / `SyncObserver` - Lifecycle events for subscribers

mod config;
mod domain;
mod lifecycle;

pub use config::*;
pub use domain::*;
pub use lifecycle::*;
