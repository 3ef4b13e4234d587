//! Engine lifecycle events.

use serde_json::Value;

use crate::domain::ContentDomain;

/// Events emitted by the content sync engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// All four initial loads settled and timers are armed.
    Initialized,
    /// Initialisation failed outside the per-domain error boundary.
    Error(String),
    /// Products payload loaded.
    ProductsLoaded(Value),
    /// Testimonials payload loaded.
    TestimonialsLoaded(Value),
    /// Live activity payload loaded.
    ActivityLoaded(Value),
    /// Settings payload loaded.
    SettingsLoaded(Value),
}

impl EngineEvent {
    /// The completion event for a domain.
    pub fn loaded(domain: ContentDomain, data: Value) -> Self {
        match domain {
            ContentDomain::Products => Self::ProductsLoaded(data),
            ContentDomain::Testimonials => Self::TestimonialsLoaded(data),
            ContentDomain::Activity => Self::ActivityLoaded(data),
            ContentDomain::Settings => Self::SettingsLoaded(data),
        }
    }

    /// Event name as seen by page scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Error(_) => "error",
            Self::ProductsLoaded(_) => "productsLoaded",
            Self::TestimonialsLoaded(_) => "testimonialsLoaded",
            Self::ActivityLoaded(_) => "activityLoaded",
            Self::SettingsLoaded(_) => "settingsLoaded",
        }
    }

    /// Domain this event belongs to, if any.
    pub fn domain(&self) -> Option<ContentDomain> {
        match self {
            Self::ProductsLoaded(_) => Some(ContentDomain::Products),
            Self::TestimonialsLoaded(_) => Some(ContentDomain::Testimonials),
            Self::ActivityLoaded(_) => Some(ContentDomain::Activity),
            Self::SettingsLoaded(_) => Some(ContentDomain::Settings),
            Self::Initialized | Self::Error(_) => None,
        }
    }

    /// Event payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::ProductsLoaded(v)
            | Self::TestimonialsLoaded(v)
            | Self::ActivityLoaded(v)
            | Self::SettingsLoaded(v) => Some(v),
            Self::Initialized | Self::Error(_) => None,
        }
    }
}

/// Observer trait for engine events.
///
/// Called synchronously on the emitting task; keep it cheap.
pub trait SyncObserver: Send + Sync {
    fn on_event(&self, event: &EngineEvent);
}

impl<F> SyncObserver for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn on_event(&self, event: &EngineEvent) {
        self(event)
    }
}
