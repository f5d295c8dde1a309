//! Integration Tests for API Endpoints
//!
//! Drives the router end to end, with a local upstream server standing in for
//! the dashboard backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use dashperf::{api::create_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

/// Starts a fake dashboard backend and returns its address and hit counter.
async fn spawn_upstream() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));

    let upstream = Router::new()
        .route(
            "/api/vessels",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!([{"id": 1, "name": "Aurora"}]))
            }),
        )
        .route(
            "/api/slow",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(300)).await;
                Json(json!({"slow": true}))
            }),
        )
        .route(
            "/api/broken",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        )
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    (addr, hits)
}

fn proxy_app(upstream: SocketAddr) -> Router {
    let config = Config {
        upstream_url: format!("http://{}", upstream),
        ..Config::default()
    };
    create_router(AppState::from_config(&config))
}

// == Diagnostics ==

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(&create_test_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_cache_stats_shape() {
    let (status, json) = get_json(&create_test_app(), "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"size": 0, "maxSize": 100, "totalHits": 0}));
}

#[tokio::test]
async fn test_requests_stats_idle() {
    let (status, json) = get_json(&create_test_app(), "/requests/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pendingRequests"], 0);
}

#[tokio::test]
async fn test_metrics_lifecycle() {
    let app = create_test_app();

    let (status, _) = send_json(
        &app,
        "POST",
        "/metrics",
        r#"{"name":"grid-render","duration":1500,"category":"render"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_json(&app, "POST", "/metrics", r#"{"name":"grid-render","duration":500}"#).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, summary) = get_json(&app, "/metrics/summary").await;
    assert_eq!(summary["totalMetrics"], 2);
    assert_eq!(summary["avgDuration"], 1000.0);
    assert_eq!(summary["slowOperations"], 1);
    assert_eq!(summary["categories"], json!({"custom": 1, "render": 1}));

    let (_, average) = get_json(&app, "/metrics/average/grid-render").await;
    assert_eq!(average["averageMs"], 1000.0);

    let (_, render) = get_json(&app, "/metrics?category=render").await;
    assert_eq!(render.as_array().unwrap().len(), 1);

    let (_, slow) = get_json(&app, "/metrics/slow?thresholdMs=400").await;
    assert_eq!(slow.as_array().unwrap().len(), 2);

    let (status, _) = send_json(&app, "DELETE", "/metrics", "").await;
    assert_eq!(status, StatusCode::OK);

    let (_, summary) = get_json(&app, "/metrics/summary").await;
    assert_eq!(summary["totalMetrics"], 0);
    assert_eq!(summary["avgDuration"], 0.0);
}

#[tokio::test]
async fn test_record_metric_rejects_empty_name() {
    let (status, json) =
        send_json(&create_test_app(), "POST", "/metrics", r#"{"name":"","duration":3}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_invalid_json_request() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cache/invalidate")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Fetch Proxy ==

#[tokio::test]
async fn test_fetch_caches_upstream_response() {
    let (upstream, hits) = spawn_upstream().await;
    let app = proxy_app(upstream);

    let (status, first) = get_json(&app, "/fetch/api/vessels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first[0]["name"], "Aurora");

    let (status, second) = get_json(&app, "/fetch/api/vessels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, first);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let (_, stats) = get_json(&app, "/cache/stats").await;
    assert_eq!(stats["size"], 1);
    assert_eq!(stats["totalHits"], 1);

    // Only the miss reached the network and was timed
    let (_, api) = get_json(&app, "/metrics?category=api").await;
    let api = api.as_array().unwrap();
    assert_eq!(api.len(), 1);
    assert_eq!(api[0]["name"], "GET /api/vessels");
}

#[tokio::test]
async fn test_fetch_with_huge_ttl_still_caches() {
    let (upstream, hits) = spawn_upstream().await;
    let app = proxy_app(upstream);

    let (status, first) = get_json(&app, "/fetch/api/vessels?ttl=18446744073709551615").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first[0]["name"], "Aurora");

    let (status, second) = get_json(&app, "/fetch/api/vessels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, first);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_bypasses_cache_when_disabled() {
    let (upstream, hits) = spawn_upstream().await;
    let app = proxy_app(upstream);

    get_json(&app, "/fetch/api/vessels?cache=false").await;
    get_json(&app, "/fetch/api/vessels?cache=false").await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    let (_, stats) = get_json(&app, "/cache/stats").await;
    assert_eq!(stats["size"], 0);
}

#[tokio::test]
async fn test_fetch_coalesces_concurrent_requests() {
    let (upstream, hits) = spawn_upstream().await;
    let app = proxy_app(upstream);

    let (a, b) = tokio::join!(
        get_json(&app, "/fetch/api/slow?cache=false"),
        get_json(&app, "/fetch/api/slow?cache=false"),
    );

    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(a.1, b.1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let (_, pending) = get_json(&app, "/requests/stats").await;
    assert_eq!(pending["pendingRequests"], 0);
}

#[tokio::test]
async fn test_fetch_upstream_error_is_bad_gateway() {
    let (upstream, _) = spawn_upstream().await;
    let app = proxy_app(upstream);

    let (status, json) = get_json(&app, "/fetch/api/broken").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("Request failed"));

    let (_, stats) = get_json(&app, "/cache/stats").await;
    assert_eq!(stats["size"], 0);
}

#[tokio::test]
async fn test_fetch_timeout_is_gateway_timeout() {
    let (upstream, _) = spawn_upstream().await;
    let app = proxy_app(upstream);

    let (status, json) = get_json(&app, "/fetch/api/slow?timeoutMs=50").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(json["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_late_response_still_populates_cache() {
    let (upstream, hits) = spawn_upstream().await;
    let app = proxy_app(upstream);

    let (status, _) = get_json(&app, "/fetch/api/slow?timeoutMs=50").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    tokio::time::sleep(Duration::from_millis(600)).await;

    let (status, json) = get_json(&app, "/fetch/api/slow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["slow"], true);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_delete_and_invalidate_cached_entries() {
    let (upstream, hits) = spawn_upstream().await;
    let app = proxy_app(upstream);

    get_json(&app, "/fetch/api/vessels").await;
    let key = format!("http://{}/api/vessels", upstream);

    let (status, json) = send_json(
        &app,
        "POST",
        "/cache/invalidate",
        &json!({"pattern": "/api/vessels$"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);

    get_json(&app, "/fetch/api/vessels").await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    let encoded = key.replace(':', "%3A").replace('/', "%2F");
    let (status, json) = send_json(&app, "DELETE", &format!("/cache/{}", encoded), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], true);

    let (status, json) = send_json(&app, "DELETE", &format!("/cache/{}", encoded), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], false);
}
