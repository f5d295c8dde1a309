//! Optimized Fetch
//!
//! Puts the response cache, request coalescing and a timeout in front of an
//! arbitrary asynchronous network operation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheStore, SharedCache, DEFAULT_TTL};
use crate::config::Config;
use crate::dedup::{RequestDeduplicator, SharedDeduplicator};
use crate::error::FetchError;

/// Outcome delivered to every caller of a fetch.
pub type FetchResult<T> = Result<T, FetchError>;

/// Default time a fetch may take before it fails with a timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// == Fetch Options ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Check the cache first and store successful results
    pub cache: bool,
    /// Lifetime of the stored result
    pub cache_ttl: Duration,
    /// Coalesce concurrent fetches for the same key
    pub deduplicate: bool,
    /// Maximum wait for the network operation
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache: true,
            cache_ttl: DEFAULT_TTL,
            deduplicate: true,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl FetchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache_ttl: Duration::from_secs(config.default_ttl),
            timeout: Duration::from_secs(config.fetch_timeout),
            ..Self::default()
        }
    }
}

// == Optimized Fetcher ==
/// Entry point callers use to run network operations.
///
/// Clones share the same cache and deduplicator.
pub struct OptimizedFetcher<T> {
    cache: SharedCache<T>,
    deduplicator: SharedDeduplicator<FetchResult<T>>,
}

impl<T> Clone for OptimizedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            deduplicator: Arc::clone(&self.deduplicator),
        }
    }
}

impl<T> OptimizedFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(cache: SharedCache<T>, deduplicator: SharedDeduplicator<FetchResult<T>>) -> Self {
        Self {
            cache,
            deduplicator,
        }
    }

    /// Builds a fetcher with its own cache sized from `config`.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.max_entries, Duration::from_secs(config.default_ttl));
        Self::new(cache.shared(), Arc::new(RequestDeduplicator::new()))
    }

    pub fn cache(&self) -> &SharedCache<T> {
        &self.cache
    }

    pub fn deduplicator(&self) -> &SharedDeduplicator<FetchResult<T>> {
        &self.deduplicator
    }

    /// Fetches `key` through the cache and request coalescing.
    ///
    /// A cache hit returns without running `operation`. On a miss the
    /// operation races `options.timeout`; a successful result is written to
    /// the cache before it is handed back, so coalesced callers share both
    /// the round trip and the write. Timing out does not cancel the
    /// operation, and a late success still populates the cache.
    pub async fn fetch<F, Fut>(&self, key: &str, options: &FetchOptions, operation: F) -> FetchResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        if options.cache {
            if let Some(value) = self.cache.write().await.get(key) {
                return Ok(value);
            }
        }

        let cache = options.cache.then(|| Arc::clone(&self.cache));
        let ttl = options.cache_ttl;
        let timeout = options.timeout;
        let owned_key = key.to_string();
        let run = move || Self::guarded_call(owned_key, cache, ttl, timeout, operation());

        if options.deduplicate {
            self.deduplicator.deduplicate(key, run).await
        } else {
            run().await
        }
    }

    /// Races the network operation against `timeout`.
    async fn guarded_call<Fut>(
        key: String,
        cache: Option<SharedCache<T>>,
        ttl: Duration,
        timeout: Duration,
        operation: Fut,
    ) -> FetchResult<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let network = Self::network_call(key.clone(), cache, ttl, operation);
        match tokio::time::timeout(timeout, network).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => Err(FetchError::upstream(join_err)),
            Err(_) => {
                warn!("Fetch timed out after {:?}: {}", timeout, key);
                Err(FetchError::Timeout { key, timeout })
            }
        }
    }

    /// Spawns the network operation so losing the timeout race leaves it running.
    fn network_call<Fut>(
        key: String,
        cache: Option<SharedCache<T>>,
        ttl: Duration,
        operation: Fut,
    ) -> tokio::task::JoinHandle<FetchResult<T>>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        tokio::spawn(async move {
            let value = operation.await.map_err(FetchError::upstream)?;
            if let Some(cache) = cache {
                cache.write().await.set(key.clone(), value.clone(), Some(ttl));
            }
            debug!("Fetched {}", key);
            Ok(value)
        })
    }
}
