//! Content sync engine for the storefront's dynamic sections.
//!
//! This crate provides:
//! - `ContentSyncEngine` - Cached fetches with retry, per-domain loads and refresh timers
//! - `EventBus` - Synchronous typed event dispatch
//! - `ContentSink` - Display update hooks for loaded content
//! - `parse_envelope` - Validation of the `{ data: { <key>: ... } }` envelope
//!
//! # Example
//!
//! ```ignore
//! use beanline_sync::{ContentSyncEngine, RefreshTarget};
//! use beanline_core::{EngineConfig, EngineEvent};
//!
//! let engine = ContentSyncEngine::builder(EngineConfig::default())
//!     .sink(my_sink)
//!     .build()?;
//!
//! engine.subscribe(|event: &EngineEvent| println!("{}", event.name()));
//! engine.init().await?;
//!
//! // Later
//! engine.refresh(RefreshTarget::Domain(ContentDomain::Products)).await?;
//! ```

mod connectivity;
mod engine;
mod envelope;
mod error;
mod events;
mod refresh;
mod sink;
mod timers;

pub use connectivity::*;
pub use engine::*;
pub use envelope::*;
pub use error::*;
pub use events::*;
pub use refresh::*;
pub use sink::*;
pub use timers::*;

pub use beanline_core::{ContentDomain, EngineConfig, EngineEvent, SyncObserver};
