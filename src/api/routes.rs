//! API Routes
//!
//! Configures the Axum router for the diagnostics panel and fetch proxy.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_clear_handler, cache_delete_handler, cache_invalidate_handler, cache_stats_handler,
    fetch_handler, health_handler, metrics_average_handler, metrics_clear_handler,
    metrics_list_handler, metrics_record_handler, metrics_slow_handler, metrics_summary_handler,
    requests_stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin so the dashboard can call it from the browser
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache", delete(cache_clear_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/invalidate", post(cache_invalidate_handler))
        .route("/cache/:key", delete(cache_delete_handler))
        .route("/requests/stats", get(requests_stats_handler))
        .route(
            "/metrics",
            get(metrics_list_handler)
                .post(metrics_record_handler)
                .delete(metrics_clear_handler),
        )
        .route("/metrics/summary", get(metrics_summary_handler))
        .route("/metrics/slow", get(metrics_slow_handler))
        .route("/metrics/average/:name", get(metrics_average_handler))
        .route("/fetch/*path", get(fetch_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
