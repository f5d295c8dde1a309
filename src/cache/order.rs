//! Creation Order Module
//!
//! Tracks the order in which cache entries were created so the store can
//! evict the oldest-created entry when it reaches capacity.

use std::collections::VecDeque;

// == Creation Order ==
/// Tracks keys by creation time for oldest-first eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = oldest created
/// - Back = most recently created
///
/// Reads never reorder keys; only (re)creation does.
#[derive(Debug, Default)]
pub struct CreationOrder {
    order: VecDeque<String>,
}

impl CreationOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records `key` as the newest entry.
    ///
    /// An overwrite recreates the entry, so an existing key moves to the back.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and forgets the oldest-created key, or None if empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
