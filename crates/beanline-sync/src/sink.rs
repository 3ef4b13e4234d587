//! Display update hooks for loaded content.

use std::time::Duration;

use beanline_core::ContentDomain;
use serde_json::Value;

/// Number of live activity entries handed to the display.
pub const LIVE_ACTIVITY_DISPLAY_LIMIT: usize = 5;

/// How long a load failure notice stays up.
pub const ERROR_NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A transient banner for the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Auto-dismiss delay. `None` means the user dismisses it.
    pub dismiss_after: Option<Duration>,
}

impl Notice {
    /// Notice shown when a domain fails to load with nothing cached.
    pub fn load_failed(domain: ContentDomain) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("Unable to load the latest {}. Please try again shortly.", domain),
            dismiss_after: Some(ERROR_NOTICE_DURATION),
        }
    }

    /// Notice shown when stale content is being served.
    pub fn stale_warning() -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: "Some content may be outdated. Retrying...".to_string(),
            dismiss_after: None,
        }
    }
}

/// Receives loaded content for display.
///
/// All methods default to no-ops so a sink only implements the parts of
/// the page it owns. Calls happen on the loading task and must not block.
pub trait ContentSink: Send + Sync {
    /// Product price and stock displays.
    fn update_product_display(&self, _products: &Value) {}

    /// Product selection in the price calculator.
    fn update_calculator_options(&self, _products: &Value) {}

    /// Testimonial carousel.
    fn update_testimonials(&self, _testimonials: &Value) {}

    /// Live activity list; at most `LIVE_ACTIVITY_DISPLAY_LIMIT` entries.
    fn update_live_activity(&self, _activities: &Value) {}

    /// Contact details.
    fn update_contact_info(&self, _settings: &Value) {}

    /// Site-wide configuration nodes.
    fn update_site_config(&self, _settings: &Value) {}

    /// Show a transient banner.
    fn show_notice(&self, _notice: Notice) {}
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ContentSink for NoopSink {}

/// Route a domain payload to the sink methods that display it.
pub(crate) fn dispatch_to_sink(sink: &dyn ContentSink, domain: ContentDomain, data: &Value) {
    match domain {
        ContentDomain::Products => {
            sink.update_product_display(data);
            sink.update_calculator_options(data);
        }
        ContentDomain::Testimonials => sink.update_testimonials(data),
        ContentDomain::Activity => sink.update_live_activity(&most_recent(data)),
        ContentDomain::Settings => {
            sink.update_contact_info(data);
            sink.update_site_config(data);
        }
    }
}

/// First `LIVE_ACTIVITY_DISPLAY_LIMIT` entries; the feed is newest first.
fn most_recent(activities: &Value) -> Value {
    match activities {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(LIVE_ACTIVITY_DISPLAY_LIMIT)
                .cloned()
                .collect(),
        ),
        other => other.clone(),
    }
}
