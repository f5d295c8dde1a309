//! Response DTOs for the diagnostics and proxy API
//!
//! Snapshots (`CacheStats`, `MetricsSummary`, `Metric`) serialize directly;
//! the types here cover the remaining acknowledgements.

use serde::Serialize;

/// Response body for `DELETE /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether an entry was actually present
    pub removed: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for `POST /cache/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub pattern: String,
    pub removed: usize,
}

/// Response body for `GET /metrics/average/:name`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageResponse {
    pub name: String,
    /// Mean duration in milliseconds, 0 when no samples exist
    pub average_ms: f64,
}

/// Plain acknowledgement for clears and writes
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_value(DeleteResponse::new("/api/ops", true)).unwrap();
        assert_eq!(json["key"], "/api/ops");
        assert_eq!(json["removed"], true);
    }

    #[test]
    fn test_average_response_serialize() {
        let resp = AverageResponse {
            name: "load".to_string(),
            average_ms: 12.0,
        };
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["averageMs"], 12.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
