//! Request DTOs for the diagnostics and proxy API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::fetch::FetchOptions;

/// Body for `POST /cache/invalidate`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Regular expression matched against cache keys
    pub pattern: String,
}

/// Body for `POST /metrics`
///
/// # Fields
/// - `name`: Operation label
/// - `duration`: Elapsed time in milliseconds
/// - `category`: Grouping tag (defaults to "custom")
/// - `metadata`: Free-form JSON attached to the sample
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMetricRequest {
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl RecordMetricRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Metric name cannot be empty".to_string());
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Some("Duration must be a non-negative number of milliseconds".to_string());
        }
        None
    }
}

/// Query for `GET /metrics`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsQuery {
    pub category: Option<String>,
}

/// Query for `GET /metrics/slow`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowQuery {
    pub threshold_ms: Option<f64>,
}

/// Query for `GET /fetch/*path`; unset fields keep the configured defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchQuery {
    pub cache: Option<bool>,
    /// Cache TTL in seconds
    pub ttl: Option<u64>,
    pub dedupe: Option<bool>,
    pub timeout_ms: Option<u64>,
}

impl FetchQuery {
    pub fn apply(&self, defaults: FetchOptions) -> FetchOptions {
        FetchOptions {
            cache: self.cache.unwrap_or(defaults.cache),
            cache_ttl: self.ttl.map(Duration::from_secs).unwrap_or(defaults.cache_ttl),
            deduplicate: self.dedupe.unwrap_or(defaults.deduplicate),
            timeout: self
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metric_deserialize() {
        let json = r#"{"name": "render-grid", "duration": 16.5}"#;
        let req: RecordMetricRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "render-grid");
        assert_eq!(req.duration, 16.5);
        assert!(req.category.is_none());
        assert!(req.metadata.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_record_metric_validation() {
        let mut req = RecordMetricRequest {
            name: " ".to_string(),
            duration: 1.0,
            category: None,
            metadata: None,
        };
        assert!(req.validate().is_some());

        req.name = "ok".to_string();
        req.duration = -1.0;
        assert!(req.validate().is_some());

        req.duration = f64::NAN;
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_fetch_query_overrides() {
        let query: FetchQuery = serde_json::from_str(r#"{"cache": false, "timeoutMs": 250}"#).unwrap();
        let options = query.apply(FetchOptions::default());

        assert!(!options.cache);
        assert!(options.deduplicate);
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.cache_ttl, FetchOptions::default().cache_ttl);
    }

    #[test]
    fn test_fetch_query_empty_keeps_defaults() {
        let defaults = FetchOptions::default();
        assert_eq!(FetchQuery::default().apply(defaults), defaults);
    }
}
