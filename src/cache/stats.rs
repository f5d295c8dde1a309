//! Cache Statistics Module
//!
//! Read-only snapshot of the cache for the diagnostics panel.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache occupancy and reuse.
///
/// Serializes as `{size, maxSize, totalHits}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries currently held, including expired ones not yet touched
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Sum of hit counters across held entries
    pub total_hits: u64,
}

impl CacheStats {
    pub fn new(size: usize, max_size: usize, total_hits: u64) -> Self {
        Self {
            size,
            max_size,
            total_hits,
        }
    }

    // == Utilization ==
    /// Fraction of capacity in use, or 0.0 for a zero-capacity cache.
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.size as f64 / self.max_size as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_size, 0);
        assert_eq!(stats.total_hits, 0);
        assert_eq!(stats.utilization(), 0.0);
    }

    #[test]
    fn test_utilization() {
        let stats = CacheStats::new(25, 100, 3);
        assert!((stats.utilization() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_serialize_shape() {
        let json = serde_json::to_value(CacheStats::new(2, 100, 7)).unwrap();
        assert_eq!(json, serde_json::json!({"size": 2, "maxSize": 100, "totalHits": 7}));
    }
}
