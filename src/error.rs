//! Error types for the performance layer
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fetch Error Enum ==
/// Failure of an orchestrated fetch.
///
/// Cloneable so a single outcome can be handed to every caller that shared
/// the same in-flight request.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The network operation did not settle in time
    #[error("Request timed out after {timeout:?}: {key}")]
    Timeout { key: String, timeout: Duration },

    /// The network operation itself failed
    #[error("Request failed: {0:#}")]
    Upstream(Arc<anyhow::Error>),
}

impl FetchError {
    pub fn upstream(err: impl Into<anyhow::Error>) -> Self {
        FetchError::Upstream(Arc::new(err.into()))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

// == API Error Enum ==
/// Error type for the diagnostics and proxy HTTP surface.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream did not answer in time
    #[error("Gateway timeout: {0}")]
    Timeout(String),

    /// Upstream answered with a failure
    #[error("Bad gateway: {0}")]
    BadGateway(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            FetchError::Upstream(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
