//! Diagnostic types for cache observability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Snapshot of cache state and lifetime counters, as returned by
/// `QueryCache::stats`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheStats {
    /// Number of live entries at snapshot time
    pub total_entries: usize,

    /// Creation time of the oldest live entry
    pub oldest_entry: Option<DateTime<Utc>>,

    /// Creation time of the newest live entry
    pub newest_entry: Option<DateTime<Utc>>,

    /// Mean age of live entries
    pub average_age: Duration,

    /// Sum of access counts across live entries
    pub total_accesses: u64,

    /// Lifetime hit counter
    pub hits: u64,

    /// Lifetime miss counter (includes expired-on-read)
    pub misses: u64,

    /// Entries removed by expiry sweeps
    pub evictions_ttl: u64,

    /// Entries removed by LRU size enforcement
    pub evictions_lru: u64,

    /// Entries removed by explicit invalidation or clear
    pub invalidations: u64,
}

impl CacheStats {
    /// Cache hit rate as a percentage of all lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Total evictions from either policy.
    pub fn total_evictions(&self) -> u64 {
        self.evictions_ttl + self.evictions_lru
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ entries: {}, hits: {}, misses: {}, hit_rate: {:.2}%, evictions: {} }}",
            self.total_entries,
            self.hits,
            self.misses,
            self.hit_rate(),
            self.total_evictions()
        )
    }
}

/// Per-entry diagnostics, as returned by `QueryCache::list_entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryInfo {
    pub key: String,

    /// Time since the entry was created
    pub age: Duration,

    pub access_count: u64,

    pub last_accessed: DateTime<Utc>,

    /// Approximate serialized payload size in bytes
    pub data_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 80.0);
    }

    #[test]
    fn test_hit_rate_zero_lookups() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_total_evictions() {
        let stats = CacheStats {
            evictions_ttl: 3,
            evictions_lru: 7,
            ..Default::default()
        };
        assert_eq!(stats.total_evictions(), 10);
    }

    #[test]
    fn test_stats_display() {
        let stats = CacheStats {
            total_entries: 5,
            hits: 100,
            misses: 50,
            ..Default::default()
        };

        let display = format!("{}", stats);
        assert!(display.contains("hits: 100"));
        assert!(display.contains("misses: 50"));
    }
}
