//! Dashperf - client-side performance layer for the operations dashboard
//!
//! Shields the UI from redundant and slow network calls with a TTL response
//! cache and request coalescing, windows long lists, records operation
//! latency, and rate-limits expensive actions.

pub mod api;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod tasks;
pub mod virtual_list;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore, SharedCache};
pub use config::Config;
pub use dedup::{RequestDeduplicator, SharedDeduplicator};
pub use error::FetchError;
pub use fetch::{FetchOptions, FetchResult, OptimizedFetcher};
pub use metrics::{measure_async, Metric, MetricsRecorder, MetricsSummary, SharedMetrics};
pub use rate_limit::{debounce, debounce_on, throttle, Debounced, Throttled};
pub use tasks::spawn_sweep_task;
pub use virtual_list::{VirtualList, VirtualListItem, VisibleRange};
