//! Metrics Module
//!
//! Lightweight latency instrumentation for UI and network operations.

mod metric;
mod recorder;

pub use metric::{Metric, MetricsSummary, CATEGORY_API, CATEGORY_CUSTOM, CATEGORY_RENDER};
pub use recorder::{measure_async, MetricsRecorder, SharedMetrics};

/// Samples kept before the oldest is dropped
pub const DEFAULT_MAX_METRICS: usize = 1000;

/// Duration above which a sample counts as slow
pub const DEFAULT_SLOW_THRESHOLD_MS: f64 = 1000.0;
