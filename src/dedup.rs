//! Request Deduplication
//!
//! When several callers ask for the same key while an operation for it is
//! still running, only the first one starts the operation; everyone else
//! waits on it and receives the same outcome.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tracing::{debug, info};

type InFlightOutcome<O> = Shared<BoxFuture<'static, O>>;

/// A running operation and the generation that started it
struct InFlight<O> {
    id: u64,
    outcome: InFlightOutcome<O>,
}

/// Request deduplication system
///
/// `O` is the operation's full outcome, typically a `Result`, and is cloned
/// once per waiting caller.
pub struct RequestDeduplicator<O> {
    /// Map of keys to in-flight operations
    pending: Arc<DashMap<String, InFlight<O>>>,
    next_id: AtomicU64,
}

impl<O> Default for RequestDeduplicator<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> RequestDeduplicator<O> {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Get statistics about pending requests
    pub fn stats(&self) -> DeduplicationStats {
        DeduplicationStats {
            pending_requests: self.pending.len(),
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    /// Forget all pending requests.
    ///
    /// Running operations are not aborted and still deliver to the callers
    /// already waiting on them; the next request for a key starts fresh.
    pub fn clear(&self) {
        self.pending.clear();
        info!("Request deduplicator cleared");
    }
}

impl<O> RequestDeduplicator<O>
where
    O: Clone + Send + Sync + 'static,
{
    /// Run `operation` for `key`, or join the one already running.
    ///
    /// The pending entry is registered before the operation is first polled
    /// and removed as soon as it settles, whatever its outcome. The operation
    /// is driven on the runtime, so it settles even if every caller goes away.
    ///
    /// `operation` is invoked while the map shard for `key` is locked. It must
    /// only build the future: touching this deduplicator from the closure body
    /// deadlocks, while doing so from inside the returned future is fine.
    pub async fn deduplicate<F, Fut>(&self, key: &str, operation: F) -> O
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = O> + Send + 'static,
    {
        let outcome = match self.pending.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Request already pending for key: {}", key);
                entry.get().outcome.clone()
            }
            Entry::Vacant(entry) => {
                debug!("Executing new request for key: {}", key);
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let outcome = Self::settle_then_forget(
                    Arc::clone(&self.pending),
                    key.to_string(),
                    id,
                    operation(),
                );
                entry.insert(InFlight {
                    id,
                    outcome: outcome.clone(),
                });
                tokio::spawn(outcome.clone());
                outcome
            }
        };

        outcome.await
    }

    fn settle_then_forget<Fut>(
        pending: Arc<DashMap<String, InFlight<O>>>,
        key: String,
        id: u64,
        operation: Fut,
    ) -> InFlightOutcome<O>
    where
        Fut: Future<Output = O> + Send + 'static,
    {
        async move {
            let outcome = operation.await;
            // A clear() followed by a new request may have replaced our entry
            if pending.remove_if(&key, |_, in_flight| in_flight.id == id).is_some() {
                debug!("Request settled for key: {}", key);
            }
            outcome
        }
        .boxed()
        .shared()
    }
}

/// Statistics for request deduplication
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationStats {
    pub pending_requests: usize,
}

/// Thread-safe wrapper for the deduplicator
pub type SharedDeduplicator<O> = Arc<RequestDeduplicator<O>>;
