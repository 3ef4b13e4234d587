//! Observability setup for beanline binaries.
//!
//! Library crates log through `tracing`; this crate installs the subscriber:
//! - `LogConfig` - Level, format and target filter
//! - `init_logging` - Idempotent subscriber installation

mod logging;

pub use logging::*;
