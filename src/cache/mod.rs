//! Cache Module
//!
//! Provides the in-memory response cache with TTL expiration and
//! oldest-first eviction.

mod entry;
mod order;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use order::CreationOrder;
pub use stats::CacheStats;
pub use store::{CacheStore, SharedCache};

// == Public Constants ==
/// Capacity used when none is configured
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Entry lifetime used when none is configured
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
