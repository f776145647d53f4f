//! Main cache store implementation with TTL expiry, LRU eviction, and
//! persistence

use crate::cache::{
    config::CacheConfig,
    entry::CacheEntry,
    persist,
    types::{CacheStats, EntryInfo},
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Thread-safe persisted cache for computed assistant results.
///
/// This implementation provides:
/// - Age-based expiry with lazy, opportunistic sweeps
/// - LRU eviction by last access when the entry bound is exceeded
/// - Atomic temp-file-then-rename persistence
/// - Hit/miss/eviction counters for diagnostics
///
/// All operations are infallible from the caller's perspective: disk
/// failures are logged and degrade to best-effort behavior (empty cache on
/// load, retained in-memory state on save).
pub struct QueryCache {
    /// Cache configuration
    pub(crate) config: CacheConfig,

    /// Entry map, dirty flag, and counters behind a single lock
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,

    /// Set when in-memory state has diverged from the persisted file
    dirty: bool,

    counters: Counters,
}

#[derive(Default)]
struct Counters {
    hits: u64,
    misses: u64,
    evictions_ttl: u64,
    evictions_lru: u64,
    invalidations: u64,
}

impl QueryCache {
    /// Open a cache backed by the configured file.
    ///
    /// A missing or unreadable file starts the cache empty; this never
    /// fails.
    pub async fn open(config: CacheConfig) -> Self {
        let entries = persist::load(&config.cache_file).await;

        info!(
            "Query cache opened with {} entries (file: {})",
            entries.len(),
            config.cache_file.display()
        );

        Self {
            config,
            inner: Mutex::new(CacheInner {
                entries,
                dirty: false,
                counters: Counters::default(),
            }),
        }
    }

    /// Retrieve a value, touching its access metadata.
    ///
    /// Returns `None` for absent or expired keys; an expired entry is
    /// removed as a side effect.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock().await;
        self.sweep_expired(&mut inner);

        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                let value = entry.value.clone();
                inner.counters.hits += 1;
                inner.dirty = true;
                debug!("Cache hit: {}", key);
                Some(value)
            }
            None => {
                inner.counters.misses += 1;
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    /// Insert or replace an entry with fresh timestamps.
    ///
    /// Marks the store dirty; the write reaches disk on the next flush.
    pub async fn put(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut inner = self.inner.lock().await;
        self.sweep_expired(&mut inner);

        let mut entry = CacheEntry::new(key.clone(), value);
        // Insertion counts as the first access
        entry.touch();
        inner.entries.insert(key, entry);

        self.enforce_size_limit(&mut inner);
        inner.dirty = true;
    }

    /// Remove a specific entry, persisting immediately.
    ///
    /// Returns whether the key was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.entries.remove(key).is_some() {
            inner.counters.invalidations += 1;
            inner.dirty = true;
            self.save_locked(&mut inner).await;
            debug!("Invalidated cache entry: {}", key);
            true
        } else {
            false
        }
    }

    /// Remove all entries, persisting immediately.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;

        let count = inner.entries.len();
        inner.entries.clear();
        inner.counters.invalidations += count as u64;
        inner.dirty = true;
        self.save_locked(&mut inner).await;

        info!("Cleared {} entries from cache", count);
    }

    /// Snapshot of cache state and lifetime counters.
    pub async fn stats(&self) -> CacheStats {
        let mut inner = self.inner.lock().await;
        self.sweep_expired(&mut inner);

        let created: Vec<_> = inner.entries.values().map(|e| e.created_at).collect();
        let total_entries = inner.entries.len();

        let average_age = if total_entries > 0 {
            let total: std::time::Duration = inner.entries.values().map(|e| e.age()).sum();
            total / total_entries as u32
        } else {
            std::time::Duration::ZERO
        };

        CacheStats {
            total_entries,
            oldest_entry: created.iter().min().copied(),
            newest_entry: created.iter().max().copied(),
            average_age,
            total_accesses: inner.entries.values().map(|e| e.access_count).sum(),
            hits: inner.counters.hits,
            misses: inner.counters.misses,
            evictions_ttl: inner.counters.evictions_ttl,
            evictions_lru: inner.counters.evictions_lru,
            invalidations: inner.counters.invalidations,
        }
    }

    /// Per-entry diagnostics, most recently accessed first.
    pub async fn list_entries(&self) -> Vec<EntryInfo> {
        let mut inner = self.inner.lock().await;
        self.sweep_expired(&mut inner);

        let mut entries: Vec<EntryInfo> = inner
            .entries
            .values()
            .map(|entry| EntryInfo {
                key: entry.key.clone(),
                age: entry.age(),
                access_count: entry.access_count,
                last_accessed: entry.last_accessed,
                data_size: entry.data_size(),
            })
            .collect();

        entries.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        entries
    }

    /// Explicit maintenance pass: expiry sweep plus size enforcement,
    /// persisting if anything changed or the store was already dirty.
    pub async fn cleanup(&self) {
        let mut inner = self.inner.lock().await;

        let old_count = inner.entries.len();
        self.sweep_expired(&mut inner);
        self.enforce_size_limit(&mut inner);
        let new_count = inner.entries.len();

        if old_count != new_count || inner.dirty {
            self.save_locked(&mut inner).await;
            debug!("Cache maintenance: {} -> {} entries", old_count, new_count);
        }
    }

    /// Flush to disk only if mutations occurred since the last flush.
    pub async fn save_if_dirty(&self) {
        let mut inner = self.inner.lock().await;
        if inner.dirty {
            self.save_locked(&mut inner).await;
        }
    }

    /// Number of live entries (includes not-yet-swept expired entries).
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Check whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// Internal: remove every entry past its maximum age.
    fn sweep_expired(&self, inner: &mut CacheInner) {
        let expired: Vec<String> = inner
            .entries
            .values()
            .filter(|entry| entry.is_expired(self.config.max_age))
            .map(|entry| entry.key.clone())
            .collect();

        if expired.is_empty() {
            return;
        }

        for key in &expired {
            inner.entries.remove(key);
        }
        inner.counters.evictions_ttl += expired.len() as u64;
        inner.dirty = true;

        debug!("Swept {} expired cache entries", expired.len());
    }

    /// Internal: evict least-recently-accessed entries until the count is
    /// within bounds.
    fn enforce_size_limit(&self, inner: &mut CacheInner) {
        if inner.entries.len() <= self.config.max_entries {
            return;
        }

        let mut by_access: Vec<(String, chrono::DateTime<chrono::Utc>)> = inner
            .entries
            .values()
            .map(|entry| (entry.key.clone(), entry.last_accessed))
            .collect();
        by_access.sort_by_key(|(_, last_accessed)| *last_accessed);

        let to_remove = inner.entries.len() - self.config.max_entries;
        for (key, _) in by_access.into_iter().take(to_remove) {
            inner.entries.remove(&key);
        }

        inner.counters.evictions_lru += to_remove as u64;
        inner.dirty = true;

        debug!("Evicted {} cache entries due to size limit", to_remove);
    }

    /// Internal: write the entry map to disk, clearing the dirty flag on
    /// success. Failures are logged; the dirty flag stays set so the next
    /// flush retries.
    async fn save_locked(&self, inner: &mut CacheInner) {
        match persist::save(&self.config.cache_file, &inner.entries).await {
            Ok(()) => inner.dirty = false,
            Err(e) => warn!(
                "Could not save cache file {}: {}",
                self.config.cache_file.display(),
                e
            ),
        }
    }
}

/// Background task that periodically flushes dirty state to disk, keeping
/// file I/O off the request path. Spawn it with the shared cache handle;
/// it runs until the task is aborted or the runtime shuts down.
pub async fn start_auto_flush(cache: Arc<QueryCache>) {
    let interval = cache.config.flush_interval;

    info!("Starting cache auto-flush task (interval: {:?})", interval);

    loop {
        tokio::time::sleep(interval).await;
        cache.save_if_dirty().await;
    }
}
