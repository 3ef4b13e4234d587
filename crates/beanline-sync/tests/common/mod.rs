#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use beanline_data::{FetchError, Response, Transport};
use beanline_sync::{ContentSink, ContentSyncEngine, EngineConfig, EngineEvent, Notice};
use serde_json::{json, Value};
use tokio::time::Instant;

pub const BASE: &str = "/backend/api";

pub fn url(endpoint: &str) -> String {
    format!("{}/{}", BASE, endpoint)
}

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Body(&'static str),
    Fail,
    Panic,
}

/// Transport that answers from per-URL queues. The last reply in a queue
/// repeats; unknown URLs fail with a connection error.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, endpoint: &str, replies: Vec<Reply>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url(endpoint), replies.into_iter().collect());
    }

    /// Successful envelope for every domain.
    pub fn route_all_ok(&self) {
        self.route("products.php", vec![Reply::Json(products_body())]);
        self.route(
            "testimonials.php?featured=true&limit=10",
            vec![Reply::Json(json!({"data": {"testimonials": [{"author": "Nairobi Roasters"}]}}))],
        );
        self.route(
            "live-activity.php?limit=20",
            vec![Reply::Json(json!({"data": {"activities": [{"event": "quote"}]}}))],
        );
        self.route(
            "settings.php",
            vec![Reply::Json(json!({"data": {"settings": {"phone": "+254 700 000 000"}}}))],
        );
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Instant> {
        let target = url(endpoint);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == target)
            .map(|(_, t)| *t)
            .collect()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls_to(endpoint).len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(body)) => Ok(Response::new(url, 200, body.to_string())),
            Some(Reply::Status(status)) => Ok(Response::new(url, status, "error")),
            Some(Reply::Body(body)) => Ok(Response::new(url, 200, body)),
            Some(Reply::Panic) => panic!("transport bug for {}", url),
            Some(Reply::Fail) | None => Err(FetchError::Connection("connection refused".into())),
        }
    }
}

pub fn products_body() -> Value {
    json!({"data": {"products": [{"id": 1, "name": "Arabica AA", "price": 4.5, "stock": 120}]}})
}

/// Sink that records what it was given.
#[derive(Default)]
pub struct RecordingSink {
    pub updates: Mutex<Vec<(&'static str, Value)>>,
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    pub fn update_names(&self) -> Vec<&'static str> {
        self.updates.lock().unwrap().iter().map(|(n, _)| *n).collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl ContentSink for RecordingSink {
    fn update_product_display(&self, v: &Value) {
        self.updates.lock().unwrap().push(("product_display", v.clone()));
    }
    fn update_calculator_options(&self, v: &Value) {
        self.updates.lock().unwrap().push(("calculator", v.clone()));
    }
    fn update_testimonials(&self, v: &Value) {
        self.updates.lock().unwrap().push(("testimonials", v.clone()));
    }
    fn update_live_activity(&self, v: &Value) {
        self.updates.lock().unwrap().push(("activity", v.clone()));
    }
    fn update_contact_info(&self, v: &Value) {
        self.updates.lock().unwrap().push(("contact", v.clone()));
    }
    fn update_site_config(&self, v: &Value) {
        self.updates.lock().unwrap().push(("site_config", v.clone()));
    }
    fn show_notice(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub fn test_config() -> EngineConfig {
    EngineConfig::default().with_api_base_url(BASE)
}

pub struct Harness {
    pub engine: ContentSyncEngine,
    pub transport: Arc<ScriptedTransport>,
    pub sink: Arc<RecordingSink>,
    pub events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl Harness {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_builder(config, |b| b)
    }

    pub fn with_builder(
        config: EngineConfig,
        customize: impl FnOnce(beanline_sync::EngineBuilder) -> beanline_sync::EngineBuilder,
    ) -> Self {
        let transport = ScriptedTransport::new();
        let sink = Arc::new(RecordingSink::default());
        let builder = ContentSyncEngine::builder(config)
            .transport_arc(transport.clone())
            .sink_arc(sink.clone());
        let engine = customize(builder).build().unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&events);
        engine.subscribe(move |e: &EngineEvent| recorded.lock().unwrap().push(e.clone()));

        Self {
            engine,
            transport,
            sink,
            events,
        }
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn count_event(&self, name: &str) -> usize {
        self.event_names().iter().filter(|n| **n == name).count()
    }
}

/// Let every ready task run before the paused clock moves on.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
