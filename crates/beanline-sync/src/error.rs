//! Engine error types.

use beanline_core::{ConfigError, UnknownDomain};
use beanline_data::FetchError;

/// Errors surfaced by the content sync engine.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// All attempts failed and no cached payload was available.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A load task ended abnormally during initialisation.
    #[error("Load task failed: {0}")]
    Join(String),

    #[error(transparent)]
    UnknownDomain(#[from] UnknownDomain),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
