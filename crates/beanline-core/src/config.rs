//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default API base path.
pub const DEFAULT_API_BASE_URL: &str = "/backend/api";

/// Upper bound for `autoRefreshInterval` and `retryDelay` (30 days).
pub const MAX_INTERVAL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the content sync engine.
///
/// Keys are camelCase on the wire so existing page configuration
/// (`apiBaseUrl`, `cacheTimeout`, ...) deserializes unchanged. All durations
/// are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Prefix prepended to every endpoint key.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum age of a cache entry that may be served without a fetch.
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout: u64,

    /// Cadence of the live activity refresh timer.
    #[serde(default = "default_auto_refresh_interval")]
    pub auto_refresh_interval: u64,

    /// Fetch attempts per logical call.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base backoff delay; attempt `n` waits `retry_delay * n` before retrying.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Per-request timeout. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,

    /// Surface the "content may be outdated" notice on stale serves.
    #[serde(default)]
    pub stale_warning: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_cache_timeout() -> u64 {
    300_000
}

fn default_auto_refresh_interval() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cache_timeout: default_cache_timeout(),
            auto_refresh_interval: default_auto_refresh_interval(),
            retry_attempts: default_retry_attempts(),
            retry_delay: default_retry_delay(),
            request_timeout: None,
            stale_warning: false,
        }
    }
}

impl EngineConfig {
    /// Load config from a file. JSON when the path ends with `.json`, TOML otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let config: Self = if display.ends_with(".json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: display.clone(),
                message: e.to_string(),
            })?
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: display.clone(),
                message: e.to_string(),
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("apiBaseUrl must not be empty".into()));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retryAttempts must be at least 1".into(),
            ));
        }
        if self.auto_refresh_interval == 0 {
            return Err(ConfigError::Invalid(
                "autoRefreshInterval must be greater than 0".into(),
            ));
        }
        if self.auto_refresh_interval > MAX_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "autoRefreshInterval must be at most {} ms",
                MAX_INTERVAL_MS
            )));
        }
        if self.retry_delay > MAX_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "retryDelay must be at most {} ms",
                MAX_INTERVAL_MS
            )));
        }
        Ok(())
    }

    /// Set the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the cache timeout.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout.as_millis() as u64;
        self
    }

    /// Set the live activity refresh interval.
    pub fn with_auto_refresh_interval(mut self, interval: Duration) -> Self {
        self.auto_refresh_interval = interval.as_millis() as u64;
        self
    }

    /// Set retry attempts and base delay.
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay.as_millis() as u64;
        self
    }

    /// Set a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout.as_millis() as u64);
        self
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout)
    }

    pub fn auto_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.auto_refresh_interval)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_millis)
    }

    /// Build the request URL for an endpoint key.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Generate a default `beanline.toml` config file.
pub fn generate_default_config() -> String {
    r#"# beanline content sync configuration

# Prefix for every endpoint request.
apiBaseUrl = "/backend/api"

# Cache entries younger than this (ms) are served without a fetch.
cacheTimeout = 300000

# Live activity refresh cadence (ms).
autoRefreshInterval = 30000

# Attempts per fetch; attempt n waits retryDelay * n before retrying.
retryAttempts = 3
retryDelay = 1000

# requestTimeout = 10000
staleWarning = false
"#
    .to_string()
}
