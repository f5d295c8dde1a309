//! Configuration Module
//!
//! Handles loading the performance layer's settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Process-wide configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the response cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for cached responses
    pub default_ttl: u64,
    /// Fetch timeout in seconds
    pub fetch_timeout: u64,
    /// Metric samples kept before the oldest is dropped
    pub max_metrics: usize,
    /// Duration in milliseconds above which a sample counts as slow
    pub slow_threshold_ms: f64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub sweep_interval: u64,
    /// Base URL the fetch proxy forwards to
    pub upstream_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `DEFAULT_TTL` - Cache TTL in seconds (default: 300)
    /// - `FETCH_TIMEOUT` - Fetch timeout in seconds (default: 30)
    /// - `MAX_METRICS` - Metric buffer size (default: 1000)
    /// - `SLOW_THRESHOLD_MS` - Slow operation threshold (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired-entry sweep in seconds (default: 0, lazy expiry only)
    /// - `UPSTREAM_URL` - Proxy target (default: http://127.0.0.1:8080)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
            max_metrics: env_or("MAX_METRICS", defaults.max_metrics),
            slow_threshold_ms: env_or("SLOW_THRESHOLD_MS", defaults.slow_threshold_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
        }
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            default_ttl: 300,
            fetch_timeout: 30,
            max_metrics: 1000,
            slow_threshold_ms: 1000.0,
            server_port: 3000,
            sweep_interval: 0,
            upstream_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}
