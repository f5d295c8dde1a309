//! Metric records and aggregate summaries.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Category for network round trips
pub const CATEGORY_API: &str = "api";
/// Category for component render timings
pub const CATEGORY_RENDER: &str = "render";
/// Category for anything else
pub const CATEGORY_CUSTOM: &str = "custom";

// == Metric ==
/// One immutable duration sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Operation label
    pub name: String,
    /// Elapsed time in milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    /// Wall-clock completion time
    pub timestamp: DateTime<Utc>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Metric {
    pub fn new(
        name: impl Into<String>,
        duration_ms: f64,
        category: impl Into<String>,
        metadata: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            duration_ms,
            timestamp: Utc::now(),
            category: category.into(),
            metadata,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
    }

    pub fn is_slower_than(&self, threshold_ms: f64) -> bool {
        self.duration_ms > threshold_ms
    }
}

// == Metrics Summary ==
/// Aggregate snapshot for the diagnostics panel.
///
/// Serializes as `{totalMetrics, avgDuration, slowOperations, categories}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_metrics: usize,
    /// Mean duration in milliseconds, 0 when empty
    pub avg_duration: f64,
    /// Count of samples above the slow threshold
    pub slow_operations: usize,
    /// Sample count per category
    pub categories: BTreeMap<String, usize>,
}
