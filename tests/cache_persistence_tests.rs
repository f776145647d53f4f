//! Integration tests for cache persistence
//!
//! These tests verify the on-disk behavior of the query cache:
//! - Entries survive a restart through the same cache file
//! - Access metadata (LRU ordering) survives a restart
//! - Corrupted and missing files load as an empty cache
//! - Expired entries are dropped on the first operation after reload
//! - Saves never leave a partially written file behind

use graphwise::cache::{CacheConfig, QueryCache};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> CacheConfig {
    CacheConfig::builder()
        .cache_file(dir.path().join("cache.json"))
        .max_age(Duration::from_secs(3600))
        .max_entries(100)
        .build()
}

#[tokio::test]
async fn test_entries_survive_restart() {
    let dir = TempDir::new().unwrap();

    {
        let cache = QueryCache::open(config_in(&dir)).await;
        cache.put("schema:main", json!({"labels": ["Person", "Movie"]})).await;
        cache.put("query:abc", json!({"query": "MATCH (n) RETURN n"})).await;
        cache.save_if_dirty().await;
    }

    let cache = QueryCache::open(config_in(&dir)).await;
    assert_eq!(cache.len().await, 2);

    let value = cache.get("schema:main").await.unwrap();
    assert_eq!(value["labels"][0], "Person");
}

#[tokio::test]
async fn test_access_metadata_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let cache = QueryCache::open(config_in(&dir)).await;
        cache.put("old", json!(1)).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.put("new", json!(2)).await;

        // Refresh "old" so it becomes the most recently used
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.get("old").await;
        cache.save_if_dirty().await;
    }

    let cache = QueryCache::open(config_in(&dir)).await;
    let entries = cache.list_entries().await;
    assert_eq!(entries[0].key, "old");
    assert!(entries[0].access_count > 0);
}

#[tokio::test]
async fn test_corrupted_file_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.json");
    tokio::fs::write(&path, "{not json at all").await.unwrap();

    let cache = QueryCache::open(config_in(&dir)).await;
    assert!(cache.is_empty().await);

    // The cache remains usable and can overwrite the bad file
    cache.put("k", json!("v")).await;
    cache.save_if_dirty().await;

    let cache = QueryCache::open(config_in(&dir)).await;
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_missing_file_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let cache = QueryCache::open(config_in(&dir)).await;
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_expired_entries_dropped_after_reload() {
    let dir = TempDir::new().unwrap();
    let short_lived = || {
        CacheConfig::builder()
            .cache_file(dir.path().join("cache.json"))
            .max_age(Duration::from_millis(50))
            .max_entries(100)
            .build()
    };

    {
        let cache = QueryCache::open(short_lived()).await;
        cache.put("ephemeral", json!("gone soon")).await;
        cache.save_if_dirty().await;
    }

    tokio::time::sleep(Duration::from_millis(80)).await;

    let cache = QueryCache::open(short_lived()).await;
    assert!(cache.get("ephemeral").await.is_none());

    let stats = cache.stats().await;
    assert_eq!(stats.evictions_ttl, 1);
}

#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();

    let cache = QueryCache::open(config_in(&dir)).await;
    cache.put("k", json!("v")).await;
    cache.save_if_dirty().await;

    let mut names = Vec::new();
    let mut reader = tokio::fs::read_dir(dir.path()).await.unwrap();
    while let Some(entry) = reader.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["cache.json"]);
}

#[tokio::test]
async fn test_save_failure_keeps_memory_state() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::builder()
        // Parent directory does not exist, so every save fails
        .cache_file(dir.path().join("missing").join("cache.json"))
        .build();

    let cache = QueryCache::open(config).await;
    cache.put("k", json!("v")).await;
    cache.save_if_dirty().await;

    // The write failed but the entry is still served from memory
    assert_eq!(cache.get("k").await, Some(json!("v")));
    assert!(!dir.path().join("missing").exists());
}

#[tokio::test]
async fn test_clear_persists_immediately() {
    let dir = TempDir::new().unwrap();

    {
        let cache = QueryCache::open(config_in(&dir)).await;
        cache.put("k", json!("v")).await;
        cache.save_if_dirty().await;
        cache.clear().await;
        // No explicit save after clear; it must have hit disk on its own
    }

    let cache = QueryCache::open(config_in(&dir)).await;
    assert!(cache.is_empty().await);
}
