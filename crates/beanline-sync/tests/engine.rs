mod common;

use std::time::Duration;

use beanline_sync::{
    ContentDomain, EngineEvent, LoadOutcome, NoticeLevel, RefreshTarget, SyncError,
};
use common::*;
use serde_json::json;
use tokio::time::Instant;

// === fetch_with_cache ===

#[tokio::test(start_paused = true)]
async fn test_fresh_cache_served_without_network() {
    let h = Harness::new(test_config());
    h.transport
        .route("products.php", vec![Reply::Json(products_body())]);

    let first = h.engine.fetch_with_cache("products.php", true).await.unwrap();
    tokio::time::advance(Duration::from_millis(100_000)).await;
    let second = h.engine.fetch_with_cache("products.php", true).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, products_body());
    assert_eq!(h.transport.call_count("products.php"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_cache_refetches() {
    let h = Harness::new(test_config());
    h.transport
        .route("products.php", vec![Reply::Json(products_body())]);

    h.engine.fetch_with_cache("products.php", true).await.unwrap();
    tokio::time::advance(Duration::from_millis(400_001)).await;
    h.engine.fetch_with_cache("products.php", true).await.unwrap();

    assert_eq!(h.transport.call_count("products.php"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_use_cache_false_always_fetches() {
    let h = Harness::new(test_config());
    h.transport
        .route("products.php", vec![Reply::Json(products_body())]);

    h.engine.fetch_with_cache("products.php", true).await.unwrap();
    h.engine.fetch_with_cache("products.php", false).await.unwrap();

    assert_eq!(h.transport.call_count("products.php"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retry_count_and_linear_backoff() {
    let h = Harness::new(test_config().with_retry(3, Duration::from_millis(1000)));
    h.transport.route("settings.php", vec![Reply::Fail]);

    let start = Instant::now();
    let result = h.engine.fetch_with_cache("settings.php", true).await;
    assert!(result.is_err());

    let offsets: Vec<u128> = h
        .transport
        .calls_to("settings.php")
        .iter()
        .map(|t| t.duration_since(start).as_millis())
        .collect();
    assert_eq!(offsets, vec![0, 1000, 3000]);
}

#[tokio::test(start_paused = true)]
async fn test_http_500_without_cache_rejects_with_status() {
    let h = Harness::new(test_config());
    h.transport.route("settings.php", vec![Reply::Status(500)]);

    let err = h
        .engine
        .fetch_with_cache("settings.php", true)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Fetch(_)));
    assert!(err.to_string().contains("500"));
    assert_eq!(h.transport.call_count("settings.php"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_last_error_is_returned() {
    let h = Harness::new(test_config());
    h.transport.route(
        "settings.php",
        vec![Reply::Fail, Reply::Fail, Reply::Status(503)],
    );

    let err = h
        .engine
        .fetch_with_cache("settings.php", true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test(start_paused = true)]
async fn test_recovers_on_later_attempt() {
    let h = Harness::new(test_config());
    h.transport.route(
        "products.php",
        vec![Reply::Status(502), Reply::Json(products_body())],
    );

    let payload = h.engine.fetch_with_cache("products.php", true).await.unwrap();
    assert_eq!(payload, products_body());
    assert_eq!(h.transport.call_count("products.php"), 2);
    assert_eq!(h.engine.get_cached_data("products.php"), Some(products_body()));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_json_is_retried_and_never_cached() {
    let h = Harness::new(test_config());
    h.transport
        .route("products.php", vec![Reply::Body("<html>maintenance</html>")]);

    assert!(h.engine.fetch_with_cache("products.php", true).await.is_err());
    assert_eq!(h.transport.call_count("products.php"), 3);
    assert!(h.engine.get_cached_data("products.php").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stale_fallback_after_exhausted_retries() {
    let h = Harness::new(test_config());
    h.transport.route(
        "products.php",
        vec![Reply::Json(products_body()), Reply::Status(500)],
    );

    h.engine.fetch_with_cache("products.php", true).await.unwrap();
    tokio::time::advance(Duration::from_secs(3600)).await;

    let payload = h.engine.fetch_with_cache("products.php", true).await.unwrap();
    assert_eq!(payload, products_body());
    assert_eq!(h.transport.call_count("products.php"), 4);
    assert!(h.sink.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stale_warning_notice_when_enabled() {
    let mut config = test_config();
    config.stale_warning = true;
    let h = Harness::new(config);
    h.transport.route(
        "products.php",
        vec![Reply::Json(products_body()), Reply::Fail],
    );

    h.engine.fetch_with_cache("products.php", false).await.unwrap();
    h.engine.fetch_with_cache("products.php", false).await.unwrap();

    let notices = h.sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
}

// === Domain loads ===

#[tokio::test(start_paused = true)]
async fn test_load_products_updates_sink_and_emits() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();

    let outcome = h.engine.load_products().await;
    assert!(outcome.is_loaded());
    assert_eq!(h.sink.update_names(), vec!["product_display", "calculator"]);

    let events = h.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![EngineEvent::ProductsLoaded(
            json!([{"id": 1, "name": "Arabica AA", "price": 4.5, "stock": 120}])
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn test_envelope_miss_is_silent() {
    let h = Harness::new(test_config());
    h.transport
        .route("products.php", vec![Reply::Json(json!({"data": {}}))]);

    let outcome = h.engine.load_products().await;
    assert!(matches!(outcome, LoadOutcome::NoData));
    assert!(h.event_names().is_empty());
    assert!(h.sink.update_names().is_empty());
    assert!(h.sink.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_load_failure_shows_notice_and_is_swallowed() {
    let h = Harness::new(test_config());
    h.transport.route("settings.php", vec![Reply::Status(500)]);

    let outcome = h.engine.load_settings().await;
    assert!(matches!(outcome, LoadOutcome::Failed(_)));
    assert!(h.event_names().is_empty());

    let notices = h.sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].dismiss_after, Some(Duration::from_secs(5)));
}

#[tokio::test(start_paused = true)]
async fn test_live_activity_always_fetches() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();

    h.engine.load_live_activity().await;
    h.engine.load_live_activity().await;
    h.engine.load_live_activity().await;

    assert_eq!(h.transport.call_count("live-activity.php?limit=20"), 3);
    assert_eq!(h.count_event("activityLoaded"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_live_activity_falls_back_to_cache() {
    let h = Harness::new(test_config());
    h.transport.route(
        "live-activity.php?limit=20",
        vec![
            Reply::Json(json!({"data": {"activities": [{"event": "sample"}]}})),
            Reply::Fail,
        ],
    );

    assert!(h.engine.load_live_activity().await.is_loaded());
    assert!(h.engine.load_live_activity().await.is_loaded());
    assert_eq!(h.count_event("activityLoaded"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_live_activity_display_capped() {
    let h = Harness::new(test_config());
    let feed: Vec<_> = (0..12).map(|i| json!({"id": i})).collect();
    h.transport.route(
        "live-activity.php?limit=20",
        vec![Reply::Json(json!({"data": {"activities": feed}}))],
    );

    h.engine.load_live_activity().await;

    let updates = h.sink.updates.lock().unwrap();
    assert_eq!(updates[0].1.as_array().unwrap().len(), 5);
    // The event carries the full feed.
    let events = h.events.lock().unwrap();
    assert_eq!(events[0].payload().unwrap().as_array().unwrap().len(), 12);
}

// === init ===

#[tokio::test(start_paused = true)]
async fn test_init_loads_all_domains_then_emits_initialized() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();

    h.engine.init().await.unwrap();

    let names = h.event_names();
    assert_eq!(names.len(), 5);
    assert_eq!(names.last(), Some(&"initialized"));
    for loaded in ["productsLoaded", "testimonialsLoaded", "activityLoaded", "settingsLoaded"] {
        assert_eq!(h.count_event(loaded), 1, "{loaded}");
    }
    assert_eq!(h.engine.active_timers(), 4);
    h.engine.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_init_isolates_failed_domain() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();
    h.transport.route("products.php", vec![Reply::Status(500)]);

    h.engine.init().await.unwrap();

    assert_eq!(h.count_event("productsLoaded"), 0);
    assert_eq!(h.count_event("testimonialsLoaded"), 1);
    assert_eq!(h.count_event("activityLoaded"), 1);
    assert_eq!(h.count_event("settingsLoaded"), 1);
    assert_eq!(h.count_event("initialized"), 1);
    assert_eq!(h.sink.notices().len(), 1);
    h.engine.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_init_task_panic_emits_error_but_others_complete() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();
    h.transport.route("products.php", vec![Reply::Panic]);

    let result = h.engine.init().await;
    assert!(matches!(result, Err(SyncError::Join(_))));

    assert_eq!(h.count_event("testimonialsLoaded"), 1);
    assert_eq!(h.count_event("activityLoaded"), 1);
    assert_eq!(h.count_event("settingsLoaded"), 1);
    assert_eq!(h.count_event("error"), 1);
    assert_eq!(h.count_event("initialized"), 0);
    assert_eq!(h.engine.active_timers(), 0);
}

// === refresh ===

#[tokio::test(start_paused = true)]
async fn test_refresh_single_domain() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();

    h.engine
        .refresh(RefreshTarget::Domain(ContentDomain::Settings))
        .await
        .unwrap();

    assert_eq!(h.event_names(), vec!["settingsLoaded"]);
    assert_eq!(h.transport.call_count("products.php"), 0);
    assert_eq!(h.engine.active_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_all_reinitialises() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();

    h.engine.init().await.unwrap();
    h.engine.refresh(RefreshTarget::All).await.unwrap();

    assert_eq!(h.count_event("initialized"), 2);
    assert_eq!(h.transport.call_count("live-activity.php?limit=20"), 2);
    h.engine.shutdown();
}

// === Cache inspection ===

#[tokio::test(start_paused = true)]
async fn test_clear_cache_scoping() {
    let h = Harness::new(test_config());
    h.transport.route_all_ok();
    h.engine.init().await.unwrap();
    h.engine.shutdown();

    assert_eq!(h.engine.cache_snapshot().len(), 4);

    h.engine.clear_cache(Some("products.php"));
    assert!(h.engine.get_cached_data("products.php").is_none());
    assert!(h.engine.get_cached_data("settings.php").is_some());
    assert_eq!(h.engine.cache_snapshot().len(), 3);

    h.engine.clear_cache(None);
    assert!(h.engine.cache_snapshot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cleared_entry_forces_fetch() {
    let h = Harness::new(test_config());
    h.transport
        .route("products.php", vec![Reply::Json(products_body())]);

    h.engine.fetch_with_cache("products.php", true).await.unwrap();
    h.engine.clear_cache(Some("products.php"));
    h.engine.fetch_with_cache("products.php", true).await.unwrap();

    assert_eq!(h.transport.call_count("products.php"), 2);
}
