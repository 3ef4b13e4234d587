//! The content sync engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use beanline_cache::{CacheEntryInfo, CacheStatus, ContentCache};
use beanline_core::{ContentDomain, EngineConfig, EngineEvent, RefreshSchedule, SyncObserver};
use beanline_data::{
    AttemptOutcome, FetchAttempt, FetchError, HttpTransport, RetryPolicy, Transport,
};
use futures::future::join_all;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::envelope::{parse_envelope, Envelope};
use crate::sink::{dispatch_to_sink, ContentSink, NoopSink, Notice};
use crate::{Connectivity, EventBus, RefreshTarget, RefreshTimers, SubscriptionId, SyncError};

/// Outcome of a single domain load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Payload unwrapped, sink updated and event emitted.
    Loaded(Value),
    /// Fetch succeeded but the envelope held no data for the domain.
    NoData,
    /// Fetch failed with nothing cached. Already logged and shown.
    Failed(SyncError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Builder for `ContentSyncEngine`.
pub struct EngineBuilder {
    config: EngineConfig,
    transport: Option<Arc<dyn Transport>>,
    sink: Option<Arc<dyn ContentSink>>,
    connectivity: Option<watch::Receiver<Connectivity>>,
}

impl EngineBuilder {
    /// Fetch through a custom transport instead of HTTP.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Fetch through a shared transport.
    pub fn transport_arc(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Receive loaded content.
    pub fn sink(mut self, sink: impl ContentSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Receive loaded content through a shared sink.
    pub fn sink_arc(mut self, sink: Arc<dyn ContentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Follow connectivity changes; going online re-initialises.
    pub fn connectivity(mut self, rx: watch::Receiver<Connectivity>) -> Self {
        self.connectivity = Some(rx);
        self
    }

    /// Validate the config and build the engine.
    pub fn build(self) -> Result<ContentSyncEngine, SyncError> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::with_timeout(self.config.request_timeout())?),
        };
        let retry = RetryPolicy::new(self.config.retry_attempts, self.config.retry_delay());

        Ok(ContentSyncEngine {
            inner: Arc::new(EngineInner {
                config: self.config,
                retry,
                transport,
                cache: ContentCache::new(),
                events: EventBus::new(),
                sink: self.sink.unwrap_or_else(|| Arc::new(NoopSink)),
                timers: RefreshTimers::new(),
                connectivity: self.connectivity,
                listener: RefreshTimers::new(),
                generation: AtomicU64::new(0),
            }),
        })
    }
}

struct EngineInner {
    config: EngineConfig,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    cache: ContentCache,
    events: EventBus,
    sink: Arc<dyn ContentSink>,
    timers: RefreshTimers,
    connectivity: Option<watch::Receiver<Connectivity>>,
    listener: RefreshTimers,
    /// Bumped by `shutdown`; an `init` started under an older value must not arm.
    generation: AtomicU64,
}

/// Fetches, caches and periodically refreshes the four content domains.
///
/// Cloning is cheap and yields a handle to the same engine. Background
/// timers hold only weak references and stop once every handle is dropped.
#[derive(Clone)]
pub struct ContentSyncEngine {
    inner: Arc<EngineInner>,
}

impl ContentSyncEngine {
    /// Start building an engine.
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            transport: None,
            sink: None,
            connectivity: None,
        }
    }

    /// Engine over HTTP with no sink.
    pub fn new(config: EngineConfig) -> Result<Self, SyncError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self, observer: impl SyncObserver + 'static) -> SubscriptionId {
        self.inner.events.subscribe(observer)
    }

    /// Subscribe a shared observer.
    pub fn subscribe_arc(&self, observer: Arc<dyn SyncObserver>) -> SubscriptionId {
        self.inner.events.subscribe_arc(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.events.unsubscribe(id)
    }

    /// Fetch `endpoint`, serving a fresh cache entry when `use_cache` allows.
    ///
    /// Failed attempts are retried with linear backoff. When every attempt
    /// fails, a cached payload of any age is returned instead; without one
    /// the last error is returned.
    pub async fn fetch_with_cache(
        &self,
        endpoint: &str,
        use_cache: bool,
    ) -> Result<Value, SyncError> {
        let inner = &self.inner;

        if use_cache {
            let lookup = inner.cache.lookup(endpoint, inner.config.cache_timeout());
            if lookup.status == CacheStatus::Hit {
                if let Some(payload) = lookup.payload {
                    debug!(endpoint, "cache hit");
                    return Ok(payload);
                }
            }
        }

        let url = inner.config.url_for(endpoint);
        let mut attempt = 1;

        let last_error = loop {
            match self.fetch_once(&url).await {
                Ok(payload) => {
                    inner.cache.insert(endpoint, payload.clone());
                    return Ok(payload);
                }
                Err(err) => {
                    let record =
                        FetchAttempt::new(endpoint, attempt, AttemptOutcome::from_error(&err));
                    warn!(
                        endpoint = %record.endpoint,
                        attempt = record.attempt_number,
                        outcome = ?record.outcome,
                        error = %err,
                        "fetch attempt failed"
                    );

                    if !inner.retry.has_attempt_after(attempt) {
                        break err;
                    }
                    let delay = inner.retry.delay_after(attempt);
                    debug!(endpoint, delay_ms = delay.as_millis() as u64, "backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        };

        match inner.cache.get(endpoint) {
            Some(stale) => {
                warn!(endpoint, "all attempts failed, serving cached content");
                if inner.config.stale_warning {
                    inner.sink.show_notice(Notice::stale_warning());
                }
                Ok(stale)
            }
            None => Err(last_error.into()),
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Value, FetchError> {
        self.inner.transport.get(url).await?.into_json_value()
    }

    /// Load one domain: fetch, unwrap, update the sink and emit its event.
    ///
    /// Failures are logged and shown as a notice, never propagated.
    pub async fn load_domain(&self, domain: ContentDomain) -> LoadOutcome {
        let body = match self
            .fetch_with_cache(domain.endpoint(), domain.uses_cache())
            .await
        {
            Ok(body) => body,
            Err(err) => {
                error!(domain = %domain, error = %err, "failed to load content");
                self.inner.sink.show_notice(Notice::load_failed(domain));
                return LoadOutcome::Failed(err);
            }
        };

        match parse_envelope(domain, &body) {
            Envelope::Payload(data) => {
                dispatch_to_sink(self.inner.sink.as_ref(), domain, &data);
                self.inner.events.emit(&EngineEvent::loaded(domain, data.clone()));
                LoadOutcome::Loaded(data)
            }
            Envelope::NoData => {
                debug!(domain = %domain, "response carried no data");
                LoadOutcome::NoData
            }
        }
    }

    pub async fn load_products(&self) -> LoadOutcome {
        self.load_domain(ContentDomain::Products).await
    }

    pub async fn load_testimonials(&self) -> LoadOutcome {
        self.load_domain(ContentDomain::Testimonials).await
    }

    /// Always fetches; the cache only serves as a failure fallback.
    pub async fn load_live_activity(&self) -> LoadOutcome {
        self.load_domain(ContentDomain::Activity).await
    }

    pub async fn load_settings(&self) -> LoadOutcome {
        self.load_domain(ContentDomain::Settings).await
    }

    /// Load all domains concurrently, then arm timers and emit `Initialized`.
    ///
    /// Domain failures are contained by `load_domain`. Only a load task that
    /// ends abnormally makes this emit `Error` and return an error; timers
    /// are left as they were in that case.
    ///
    /// If `shutdown` runs while the loads are in flight, nothing is armed and
    /// `Initialized` is not emitted.
    pub async fn init(&self) -> Result<(), SyncError> {
        info!("initializing content sync");
        let generation = self.inner.generation.load(Ordering::SeqCst);

        let loads: Vec<JoinHandle<LoadOutcome>> = ContentDomain::ALL
            .iter()
            .map(|&domain| {
                let engine = self.clone();
                tokio::spawn(async move { engine.load_domain(domain).await })
            })
            .collect();

        let failure = join_all(loads)
            .await
            .into_iter()
            .find_map(|result| result.err())
            .map(|e| e.to_string());

        if let Some(message) = failure {
            error!(error = %message, "content sync initialization failed");
            self.inner.events.emit(&EngineEvent::Error(message.clone()));
            return Err(SyncError::Join(message));
        }

        if !self.is_generation(generation) {
            info!("content sync stopped during initialization");
            return Ok(());
        }
        self.arm_timers();
        self.arm_connectivity_listener();
        if !self.is_generation(generation) {
            // Shutdown raced with arming.
            self.inner.timers.cancel();
            self.inner.listener.cancel();
            return Ok(());
        }

        info!("content sync initialized");
        self.inner.events.emit(&EngineEvent::Initialized);
        Ok(())
    }

    /// Manually re-run a domain load, or everything.
    pub async fn refresh(&self, target: RefreshTarget) -> Result<(), SyncError> {
        match target {
            RefreshTarget::All => self.init().await,
            RefreshTarget::Domain(domain) => {
                self.load_domain(domain).await;
                Ok(())
            }
        }
    }

    /// React to a connectivity change.
    ///
    /// Going online spawns a full re-initialisation and returns its handle.
    /// Going offline changes nothing; reads keep falling back to the cache.
    pub fn handle_connectivity(&self, state: Connectivity) -> Option<JoinHandle<()>> {
        match state {
            Connectivity::Online => {
                info!("connection restored, reloading content");
                let engine = self.clone();
                Some(tokio::spawn(async move {
                    let _ = engine.init().await;
                }))
            }
            Connectivity::Offline => {
                info!("connection lost, serving cached content");
                None
            }
        }
    }

    /// Cached payload for `endpoint`, regardless of age.
    pub fn get_cached_data(&self, endpoint: &str) -> Option<Value> {
        self.inner.cache.get(endpoint)
    }

    /// Remove one cache entry, or all of them when `endpoint` is `None`.
    pub fn clear_cache(&self, endpoint: Option<&str>) {
        match endpoint {
            Some(key) => {
                self.inner.cache.remove(key);
            }
            None => self.inner.cache.clear(),
        }
    }

    /// Descriptions of every cache entry.
    pub fn cache_snapshot(&self) -> Vec<CacheEntryInfo> {
        self.inner.cache.snapshot()
    }

    /// Number of refresh timers currently running.
    pub fn active_timers(&self) -> usize {
        self.inner.timers.active()
    }

    /// Stop refresh timers and the connectivity listener.
    ///
    /// An `init` still awaiting its loads will not arm anything afterwards.
    pub fn shutdown(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.timers.cancel();
        self.inner.listener.cancel();
        info!("content sync stopped");
    }

    fn is_generation(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }

    fn arm_timers(&self) {
        let handles = RefreshSchedule::all(&self.inner.config)
            .into_iter()
            .map(|schedule| {
                debug!(
                    domain = %schedule.domain,
                    interval_ms = schedule.interval.as_millis() as u64,
                    "arming refresh timer"
                );
                tokio::spawn(refresh_loop(Arc::downgrade(&self.inner), schedule))
            })
            .collect();
        self.inner.timers.replace(handles);
        info!("refresh timers armed");
    }

    fn arm_connectivity_listener(&self) {
        let Some(rx) = &self.inner.connectivity else {
            return;
        };
        let mut rx = rx.clone();
        rx.borrow_and_update();
        let weak = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = *rx.borrow_and_update();
                info!(state = %state, "connectivity changed");
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                ContentSyncEngine { inner }.handle_connectivity(state);
            }
        });
        self.inner.listener.replace(vec![handle]);
    }
}

impl std::fmt::Debug for ContentSyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSyncEngine")
            .field("config", &self.inner.config)
            .field("cached", &self.inner.cache.len())
            .field("events", &self.inner.events)
            .field("timers", &self.inner.timers.active())
            .finish()
    }
}

/// Re-load one domain every `schedule.interval`, starting one interval out.
///
/// Each tick spawns its load, so a slow fetch never delays the next tick.
async fn refresh_loop(weak: Weak<EngineInner>, schedule: RefreshSchedule) {
    let Some(start) = Instant::now().checked_add(schedule.interval) else {
        warn!(domain = %schedule.domain, "refresh interval out of range, timer not started");
        return;
    };
    let mut ticker = interval_at(start, schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(inner) = weak.upgrade() else {
            break;
        };
        let engine = ContentSyncEngine { inner };
        let domain = schedule.domain;
        debug!(domain = %domain, "scheduled refresh");
        tokio::spawn(async move {
            engine.load_domain(domain).await;
        });
    }
}
