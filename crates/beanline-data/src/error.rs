//! Fetch error types.

/// Errors from a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Could not reach the server.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request exceeded the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Request could not be built or sent.
    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}
