//! Retry policy for fetch operations.

use std::time::Duration;

use crate::FetchError;

/// Retry policy: a fixed number of attempts with linear backoff.
///
/// The wait after failed attempt `n` (1-based) is `base_delay * n`, so with
/// three attempts and a 1s base the attempts start at t=0, t=1s and t=3s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per logical fetch, including the first.
    pub max_attempts: u32,
    /// Base delay multiplied by the attempt number.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Whether another attempt follows attempt `attempt`.
    pub fn has_attempt_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1_000))
    }
}

/// How a failed fetch attempt went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    HttpError,
    NetworkError,
}

impl AttemptOutcome {
    /// Classify a fetch error.
    pub fn from_error(error: &FetchError) -> Self {
        match error {
            FetchError::Http { .. } | FetchError::Parse(_) => Self::HttpError,
            FetchError::Connection(_) | FetchError::Timeout(_) | FetchError::Request(_) => {
                Self::NetworkError
            }
        }
    }
}

/// One attempt within a logical fetch. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub endpoint: String,
    pub attempt_number: u32,
    pub outcome: AttemptOutcome,
}

impl FetchAttempt {
    pub fn new(endpoint: impl Into<String>, attempt_number: u32, outcome: AttemptOutcome) -> Self {
        Self {
            endpoint: endpoint.into(),
            attempt_number,
            outcome,
        }
    }
}
