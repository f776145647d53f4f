//! Cache entry management with age-based expiry

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

/// A cached item with its access metadata.
///
/// An entry is expired once its age (time since creation) exceeds the
/// store's `max_age`; access refreshes `last_accessed` for LRU ordering but
/// never extends the entry's lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cache key
    pub key: String,

    /// Opaque cached payload
    pub value: Value,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// Last access time (drives LRU eviction)
    pub last_accessed: DateTime<Utc>,

    /// Number of times this entry has been accessed
    pub access_count: u64,
}

impl CacheEntry {
    /// Create a fresh entry with zero accesses.
    pub fn new(key: String, value: Value) -> Self {
        let now = Utc::now();
        Self {
            key,
            value,
            created_at: now,
            last_accessed: now,
            access_count: 0,
        }
    }

    /// Check whether the entry has outlived `max_age`.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }

    /// Record an access: bumps the count and refreshes the LRU timestamp.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed = Utc::now();
    }

    /// Age of the entry since creation.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.created_at)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }

    /// Approximate serialized size of the payload in bytes.
    pub fn data_size(&self) -> usize {
        serde_json::to_string(&self.value)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("schema".to_string(), json!({"labels": ["Person"]}));

        assert_eq!(entry.key, "schema");
        assert_eq!(entry.access_count, 0);
        assert!(!entry.is_expired(Duration::from_secs(3600)));
        assert_eq!(entry.created_at, entry.last_accessed);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("k".to_string(), json!("v"));

        assert!(!entry.is_expired(Duration::from_millis(100)));
        sleep(Duration::from_millis(150));
        assert!(entry.is_expired(Duration::from_millis(100)));
    }

    #[test]
    fn test_touch() {
        let mut entry = CacheEntry::new("k".to_string(), json!("v"));
        let initial_time = entry.last_accessed;

        sleep(Duration::from_millis(10));
        entry.touch();
        entry.touch();

        assert_eq!(entry.access_count, 2);
        assert!(entry.last_accessed > initial_time);
        // Expiry is driven by creation time, not access
        assert_eq!(entry.created_at, initial_time);
    }

    #[test]
    fn test_data_size() {
        let entry = CacheEntry::new("k".to_string(), json!({"query": "MATCH (n) RETURN n"}));
        assert!(entry.data_size() >= "MATCH (n) RETURN n".len());

        let empty = CacheEntry::new("k".to_string(), Value::Null);
        assert_eq!(empty.data_size(), "null".len());
    }
}
