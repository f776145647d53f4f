//! # Persisted Query Cache
//!
//! Thread-safe keyed store for computed assistant results with age-based
//! expiry, an LRU size bound, and atomic disk persistence.
//!
//! ## Features
//!
//! - **Age-Based Expiry**: entries are removed once older than `max_age`,
//!   swept lazily at the start of every operation
//! - **LRU Eviction**: when the entry bound is exceeded, the least recently
//!   accessed entries go first
//! - **Atomic Persistence**: the on-disk JSON file is written via a
//!   temp-file-then-rename, so it is never left partially written
//! - **Graceful Degradation**: disk failures are logged, never surfaced;
//!   a corrupt file loads as an empty cache
//!
//! ## Example
//!
//! ```no_run
//! use graphwise::cache::{CacheConfig, QueryCache};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let config = CacheConfig::builder()
//!     .cache_file(".assistant_cache.json")
//!     .max_age(Duration::from_secs(24 * 3600))
//!     .max_entries(100)
//!     .build();
//!
//! let cache = QueryCache::open(config).await;
//!
//! cache.put("schema:abc123", json!({"labels": ["Person"]})).await;
//!
//! if let Some(value) = cache.get("schema:abc123").await {
//!     println!("Cache hit: {}", value);
//! }
//!
//! cache.save_if_dirty().await;
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod keys;
mod persist;
pub mod records;
pub mod store;
pub mod types;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use entry::CacheEntry;
pub use keys::{database_key, request_key, CacheKeyBuilder, KeyScope};
pub use records::CachedQuery;
pub use store::{start_auto_flush, QueryCache};
pub use types::{CacheStats, EntryInfo};
