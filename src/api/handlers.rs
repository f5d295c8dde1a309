//! API Handlers
//!
//! HTTP request handlers for the diagnostics panel and the fetch proxy.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use regex::Regex;
use serde_json::Value;
use tracing::info;

use crate::cache::CacheStats;
use crate::config::Config;
use crate::dedup::DeduplicationStats;
use crate::error::{ApiError, Result};
use crate::fetch::{FetchOptions, OptimizedFetcher};
use crate::metrics::{
    measure_async, Metric, MetricsRecorder, MetricsSummary, SharedMetrics, CATEGORY_API,
    CATEGORY_CUSTOM,
};
use crate::models::{
    AverageResponse, DeleteResponse, FetchQuery, HealthResponse, InvalidateRequest,
    InvalidateResponse, MessageResponse, MetricsQuery, RecordMetricRequest, SlowQuery,
};

/// Application state shared across all handlers.
///
/// This is the composition root: one cache, one deduplicator and one metrics
/// recorder per process, handed to every handler by reference.
#[derive(Clone)]
pub struct AppState {
    /// Cache + dedup pipeline for upstream JSON
    pub fetcher: OptimizedFetcher<Value>,
    /// Process-wide metrics recorder
    pub metrics: SharedMetrics,
    /// Options applied when a request does not override them
    pub fetch_defaults: FetchOptions,
    /// Base URL the proxy forwards to
    pub upstream_url: String,
    http: reqwest::Client,
}

impl AppState {
    /// Creates a new AppState from already-built components.
    pub fn new(fetcher: OptimizedFetcher<Value>, metrics: SharedMetrics, config: &Config) -> Self {
        Self {
            fetcher,
            metrics,
            fetch_defaults: FetchOptions::from_config(config),
            upstream_url: config.upstream_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let fetcher = OptimizedFetcher::from_config(config);
        let metrics = MetricsRecorder::new(config.max_metrics, config.slow_threshold_ms).shared();
        Self::new(fetcher, metrics, config)
    }
}

// == Cache ==

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.fetcher.cache().read().await.stats())
}

/// Handler for DELETE /cache
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.fetcher.cache().write().await.clear();
    info!("Cache cleared via API");
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for DELETE /cache/:key
pub async fn cache_delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let removed = state.fetcher.cache().write().await.delete(&key);
    Json(DeleteResponse::new(key, removed))
}

/// Handler for POST /cache/invalidate
pub async fn cache_invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let matcher = Regex::new(&req.pattern)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid pattern: {}", e)))?;

    let removed = state
        .fetcher
        .cache()
        .write()
        .await
        .invalidate_pattern(|key| matcher.is_match(key));

    Ok(Json(InvalidateResponse {
        pattern: req.pattern,
        removed,
    }))
}

/// Handler for GET /requests/stats
pub async fn requests_stats_handler(State(state): State<AppState>) -> Json<DeduplicationStats> {
    Json(state.fetcher.deduplicator().stats())
}

// == Metrics ==

/// Handler for GET /metrics
pub async fn metrics_list_handler(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Json<Vec<Metric>> {
    Json(state.metrics.read().await.metrics(query.category.as_deref()))
}

/// Handler for POST /metrics
pub async fn metrics_record_handler(
    State(state): State<AppState>,
    Json(req): Json<RecordMetricRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let category = req.category.unwrap_or_else(|| CATEGORY_CUSTOM.to_string());
    state
        .metrics
        .write()
        .await
        .record_metric(req.name.as_str(), req.duration, category, req.metadata);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Metric '{}' recorded", req.name))),
    ))
}

/// Handler for GET /metrics/summary
pub async fn metrics_summary_handler(State(state): State<AppState>) -> Json<MetricsSummary> {
    Json(state.metrics.read().await.summary())
}

/// Handler for GET /metrics/slow
pub async fn metrics_slow_handler(
    State(state): State<AppState>,
    Query(query): Query<SlowQuery>,
) -> Json<Vec<Metric>> {
    let recorder = state.metrics.read().await;
    let threshold = query.threshold_ms.unwrap_or(recorder.slow_threshold_ms());
    Json(recorder.slow_operations(threshold))
}

/// Handler for GET /metrics/average/:name
pub async fn metrics_average_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<AverageResponse> {
    let average_ms = state.metrics.read().await.average_time(&name);
    Json(AverageResponse { name, average_ms })
}

/// Handler for DELETE /metrics
pub async fn metrics_clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.metrics.write().await.clear();
    Json(MessageResponse::new("Metrics cleared"))
}

// == Proxy ==

/// Handler for GET /fetch/*path
///
/// Forwards to `upstream_url/path` through the cache and request coalescing.
/// Only requests that reach the upstream record an `api` metric.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<Value>> {
    let options = query.apply(state.fetch_defaults);
    let url = format!("{}/{}", state.upstream_url, path.trim_start_matches('/'));

    let http = state.http.clone();
    let metrics = state.metrics.clone();
    let target = url.clone();
    let label = format!("GET /{}", path.trim_start_matches('/'));

    let body = state
        .fetcher
        .fetch(&url, &options, move || async move {
            measure_async(&metrics, &label, CATEGORY_API, async {
                let response = http.get(&target).send().await?.error_for_status()?;
                Ok::<_, anyhow::Error>(response.json::<Value>().await?)
            })
            .await
        })
        .await?;

    Ok(Json(body))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
