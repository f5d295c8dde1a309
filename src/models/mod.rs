//! Request and Response models for the HTTP surface
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{FetchQuery, InvalidateRequest, MetricsQuery, RecordMetricRequest, SlowQuery};
pub use responses::{
    AverageResponse, DeleteResponse, HealthResponse, InvalidateResponse, MessageResponse,
};
