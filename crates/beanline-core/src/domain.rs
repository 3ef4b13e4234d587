//! Content domains and their refresh schedules.

use std::str::FromStr;
use std::time::Duration;

use crate::config::EngineConfig;

/// The four independently refreshed content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentDomain {
    /// Product prices and stock.
    Products,
    /// Featured customer testimonials.
    Testimonials,
    /// Live activity feed.
    Activity,
    /// Contact info and site configuration.
    Settings,
}

impl ContentDomain {
    /// All domains, in load order.
    pub const ALL: [ContentDomain; 4] = [
        Self::Products,
        Self::Testimonials,
        Self::Activity,
        Self::Settings,
    ];

    /// Endpoint key (relative to the API base), also used as the cache key.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Products => "products.php",
            Self::Testimonials => "testimonials.php?featured=true&limit=10",
            Self::Activity => "live-activity.php?limit=20",
            Self::Settings => "settings.php",
        }
    }

    /// Key under `data` in the response envelope.
    pub fn envelope_key(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Testimonials => "testimonials",
            Self::Activity => "activities",
            Self::Settings => "settings",
        }
    }

    /// Whether reads for this domain may be served from a fresh cache entry.
    pub fn uses_cache(&self) -> bool {
        !matches!(self, Self::Activity)
    }

    /// Refresh cadence. Activity follows `autoRefreshInterval`.
    pub fn refresh_interval(&self, config: &EngineConfig) -> Duration {
        match self {
            Self::Products => Duration::from_millis(300_000),
            Self::Testimonials => Duration::from_millis(3_600_000),
            Self::Activity => config.auto_refresh_interval(),
            Self::Settings => Duration::from_millis(600_000),
        }
    }

    /// Name used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Testimonials => "testimonials",
            Self::Activity => "activity",
            Self::Settings => "settings",
        }
    }
}

impl std::fmt::Display for ContentDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for unrecognised domain names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown content domain: {0}")]
pub struct UnknownDomain(pub String);

impl FromStr for ContentDomain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "products" => Ok(Self::Products),
            "testimonials" => Ok(Self::Testimonials),
            "activity" | "live-activity" => Ok(Self::Activity),
            "settings" => Ok(Self::Settings),
            other => Err(UnknownDomain(other.to_string())),
        }
    }
}

/// Refresh schedule for one domain, fixed at engine construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub domain: ContentDomain,
    pub interval: Duration,
    pub use_cache: bool,
}

impl RefreshSchedule {
    /// Schedule for a domain under the given config.
    pub fn for_domain(domain: ContentDomain, config: &EngineConfig) -> Self {
        Self {
            domain,
            interval: domain.refresh_interval(config),
            use_cache: domain.uses_cache(),
        }
    }

    /// Schedules for all four domains.
    pub fn all(config: &EngineConfig) -> Vec<Self> {
        ContentDomain::ALL
            .iter()
            .map(|d| Self::for_domain(*d, config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(ContentDomain::Products.endpoint(), "products.php");
        assert_eq!(
            ContentDomain::Testimonials.endpoint(),
            "testimonials.php?featured=true&limit=10"
        );
        assert_eq!(ContentDomain::Activity.endpoint(), "live-activity.php?limit=20");
        assert_eq!(ContentDomain::Settings.endpoint(), "settings.php");
    }

    #[test]
    fn test_activity_envelope_key_is_plural() {
        assert_eq!(ContentDomain::Activity.envelope_key(), "activities");
    }

    #[test]
    fn test_only_activity_bypasses_cache() {
        for domain in ContentDomain::ALL {
            assert_eq!(domain.uses_cache(), domain != ContentDomain::Activity);
        }
    }

    #[test]
    fn test_refresh_intervals() {
        let config = EngineConfig::default().with_auto_refresh_interval(Duration::from_secs(7));
        let schedules = RefreshSchedule::all(&config);
        let intervals: Vec<_> = schedules.iter().map(|s| s.interval.as_millis()).collect();
        assert_eq!(intervals, vec![300_000, 3_600_000, 7_000, 600_000]);
    }

    #[test]
    fn test_parse_domain() {
        assert_eq!("products".parse::<ContentDomain>(), Ok(ContentDomain::Products));
        assert_eq!(" Settings ".parse::<ContentDomain>(), Ok(ContentDomain::Settings));
        assert_eq!("activity".parse::<ContentDomain>(), Ok(ContentDomain::Activity));
        assert_eq!(
            "weather".parse::<ContentDomain>(),
            Err(UnknownDomain("weather".into()))
        );
    }
}
