//! API Module
//!
//! HTTP handlers and routing for the diagnostics panel and fetch proxy.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /cache/stats` - Cache snapshot `{size, maxSize, totalHits}`
//! - `DELETE /cache`, `DELETE /cache/:key` - Clear the cache or drop one key
//! - `POST /cache/invalidate` - Drop keys matching a regex
//! - `GET /requests/stats` - In-flight request count
//! - `GET|POST|DELETE /metrics` - List, record or clear metric samples
//! - `GET /metrics/summary`, `/metrics/slow`, `/metrics/average/:name`
//! - `GET /fetch/*path` - Cached, coalesced proxy to the upstream API

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
