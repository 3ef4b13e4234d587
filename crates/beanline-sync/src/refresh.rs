//! Manual refresh targets.

use std::str::FromStr;

use beanline_core::{ContentDomain, UnknownDomain};

/// What a manual refresh re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshTarget {
    /// Full re-initialisation: all loads, then timers re-armed.
    #[default]
    All,
    /// A single domain load.
    Domain(ContentDomain),
}

impl FromStr for RefreshTarget {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Domain)
    }
}

impl From<ContentDomain> for RefreshTarget {
    fn from(domain: ContentDomain) -> Self {
        Self::Domain(domain)
    }
}
