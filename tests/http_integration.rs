#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use actix_web::{test, web, App};
use dojo_agent::{routes, AppState, BurnLimits, ListStore, MemoryStore, Metrics};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn state_with(store: Arc<MemoryStore>, limits: BurnLimits) -> AppState {
    let store: Arc<dyn ListStore> = store;
    AppState::new(store, Metrics::new().expect("metrics"), limits)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(routes),
        )
        .await
    };
}

#[actix_web::test]
async fn burn_returns_ok_after_duration() {
    let app = app!(state_with(Arc::default(), BurnLimits::unbounded()));
    let started = Instant::now();
    let req = test::TestRequest::get()
        .uri("/burn?seconds=1&workers=1&mem_mb=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let elapsed = started.elapsed();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], br#"{"ok":true}"#);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3));
}

#[actix_web::test]
async fn burn_clamps_nonsense_parameters() {
    let app = app!(state_with(Arc::default(), BurnLimits::unbounded()));
    let started = Instant::now();
    let req = test::TestRequest::get()
        .uri("/burn?seconds=-5&workers=0&mem_mb=-3")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3));
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], br#"{"ok":true}"#);
}

#[actix_web::test]
async fn burn_limits_cap_duration() {
    let limits = BurnLimits {
        max_seconds: Some(1),
        max_workers: Some(1),
        max_mem_mb: Some(0),
    };
    let app = app!(state_with(Arc::default(), limits));
    let started = Instant::now();
    let req = test::TestRequest::get()
        .uri("/burn?seconds=30&workers=64&mem_mb=1024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[actix_web::test]
async fn burn_with_malformed_query_still_succeeds() {
    let limits = BurnLimits {
        max_seconds: Some(1),
        ..BurnLimits::default()
    };
    let app = app!(state_with(Arc::default(), limits));
    let req = test::TestRequest::get()
        .uri("/burn?seconds=abc&workers=1&mem_mb=%ZZ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn rpush_then_lrange() {
    let store = Arc::new(MemoryStore::default());
    let state = state_with(store.clone(), BurnLimits::unbounded());
    let metrics = state.metrics.clone();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/rpush/guestbook/hello").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: Vec<String> = test::read_body_json(resp).await;
    assert_eq!(body, vec!["hello"]);

    let req = test::TestRequest::get().uri("/rpush/guestbook/world").to_request();
    let _ = test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/lrange/guestbook").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = test::read_body(resp).await;
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        "[\n  \"hello\",\n  \"world\"\n]"
    );
    assert_eq!(metrics.store_op_count("rpush"), 2);
    assert_eq!(metrics.store_op_count("lrange"), 3);
}

#[actix_web::test]
async fn lrange_of_missing_key_is_empty_array() {
    let app = app!(state_with(Arc::default(), BurnLimits::unbounded()));
    let req = test::TestRequest::get().uri("/lrange/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"[]");
}

#[actix_web::test]
async fn healthz_follows_store() {
    let store = Arc::new(MemoryStore::default());
    let app = app!(state_with(store.clone(), BurnLimits::unbounded()));

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    store.set_available(false);
    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"store unavailable");
}

#[actix_web::test]
async fn store_failures_map_to_500() {
    let store = Arc::new(MemoryStore::default());
    store.set_available(false);
    let app = app!(state_with(store, BurnLimits::unbounded()));
    for uri in ["/lrange/k", "/rpush/k/v", "/info"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 500, "{uri}");
    }
}

#[actix_web::test]
async fn info_is_plain_text() {
    let app = app!(state_with(Arc::default(), BurnLimits::unbounded()));
    let req = test::TestRequest::get().uri("/info").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );
}

#[actix_web::test]
async fn env_dumps_process_environment() {
    let app = app!(state_with(Arc::default(), BurnLimits::unbounded()));
    let req = test::TestRequest::get().uri("/env").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: std::collections::BTreeMap<String, String> = test::read_body_json(resp).await;
    if let Ok(path) = std::env::var("PATH") {
        assert_eq!(body.get("PATH"), Some(&path));
    }
}

#[actix_web::test]
async fn metrics_scrape() {
    let app = app!(state_with(Arc::default(), BurnLimits::unbounded()));
    let req = test::TestRequest::get().uri("/healthz").to_request();
    let _ = test::call_service(&app, req).await;
    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("dojo_redis_operations_total{op=\"ping\"} 1"));
}
