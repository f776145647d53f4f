//! Concurrency tests for the query cache
//!
//! Many tasks share one cache through an `Arc` and hammer it with mixed
//! operations. The cache must stay consistent: no panics, the entry bound is
//! never exceeded, and counters add up.

use futures::future::join_all;
use graphwise::cache::{CacheConfig, QueryCache};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_concurrent_writers_respect_entry_bound() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::builder()
        .cache_file(dir.path().join("cache.json"))
        .max_age(Duration::from_secs(3600))
        .max_entries(10)
        .build();
    let cache = Arc::new(QueryCache::open(config).await);

    let mut handles = Vec::new();
    for task in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                cache
                    .put(format!("task{}:key{}", task, i), json!({"n": i}))
                    .await;
                assert!(cache.len().await <= 10);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(cache.len().await <= 10);
    let stats = cache.stats().await;
    assert_eq!(stats.evictions_lru, 400 - stats.total_entries as u64);
}

#[tokio::test]
async fn test_concurrent_mixed_operations() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::builder()
        .cache_file(dir.path().join("cache.json"))
        .max_age(Duration::from_secs(3600))
        .max_entries(50)
        .build();
    let cache = Arc::new(QueryCache::open(config).await);

    for i in 0..20 {
        cache.put(format!("seed{}", i), json!(i)).await;
    }

    let mut handles = Vec::new();

    for task in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                cache.put(format!("w{}:{}", task, i), json!(i)).await;
            }
        }));
    }
    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                cache.get(&format!("seed{}", i % 20)).await;
            }
        }));
    }
    {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                cache.cleanup().await;
                cache.stats().await;
            }
        }));
    }

    for result in join_all(handles).await {
        result.unwrap();
    }

    let stats = cache.stats().await;
    assert!(stats.total_entries <= 50);
    assert_eq!(stats.hits + stats.misses, 100);
}

#[tokio::test]
async fn test_concurrent_saves_produce_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.json");
    let config = CacheConfig::builder()
        .cache_file(&path)
        .max_age(Duration::from_secs(3600))
        .max_entries(100)
        .build();
    let cache = Arc::new(QueryCache::open(config).await);

    let mut handles = Vec::new();
    for task in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                cache.put(format!("t{}:{}", task, i), json!(i)).await;
                cache.save_if_dirty().await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Whatever interleaving happened, the file on disk parses
    let bytes = tokio::fs::read(&path).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(parsed["entries"].is_object());
}
