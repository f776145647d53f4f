//! Durable storage for the query cache
//!
//! The on-disk format is a single JSON document:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "created": 1700000000.0,
//!   "entries": {
//!     "<key>": {
//!       "data": {},
//!       "timestamp": 1700000000.0,
//!       "access_count": 3,
//!       "last_accessed": 1700000100.0
//!     }
//!   }
//! }
//! ```
//!
//! Timestamps are fractional epoch seconds. Writes go to a `.tmp` sibling
//! first and are renamed into place, so the target file is never left
//! partially written. A missing or unreadable file loads as an empty cache.

use crate::cache::entry::CacheEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: String,
    created: f64,
    entries: HashMap<String, PersistedEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    data: Value,
    timestamp: f64,
    #[serde(default)]
    access_count: u64,
    #[serde(default)]
    last_accessed: f64,
}

fn to_epoch(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_micros() as f64 / 1_000_000.0
}

fn from_epoch(secs: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros((secs * 1_000_000.0) as i64).unwrap_or_else(Utc::now)
}

/// Load the entry map from disk.
///
/// Never fails: a missing, unreadable, or corrupted file yields an empty
/// map, with a warning for anything other than a missing file.
pub(crate) async fn load(path: &Path) -> HashMap<String, CacheEntry> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!("Could not read cache file {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    let file: CacheFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            warn!(
                "Cache file {} is corrupted, starting empty: {}",
                path.display(),
                e
            );
            return HashMap::new();
        }
    };

    if file.version != FORMAT_VERSION {
        warn!(
            "Cache file {} has unexpected version {:?}",
            path.display(),
            file.version
        );
    }

    let entries: HashMap<String, CacheEntry> = file
        .entries
        .into_iter()
        .map(|(key, persisted)| {
            // Older files may lack last_accessed; fall back to creation time
            let last_accessed = if persisted.last_accessed > 0.0 {
                persisted.last_accessed
            } else {
                persisted.timestamp
            };

            let entry = CacheEntry {
                key: key.clone(),
                value: persisted.data,
                created_at: from_epoch(persisted.timestamp),
                last_accessed: from_epoch(last_accessed),
                access_count: persisted.access_count,
            };
            (key, entry)
        })
        .collect();

    debug!(
        "Loaded {} cache entries from {}",
        entries.len(),
        path.display()
    );
    entries
}

/// Write the entry map to disk atomically.
pub(crate) async fn save(
    path: &Path,
    entries: &HashMap<String, CacheEntry>,
) -> std::io::Result<()> {
    let persisted: HashMap<&String, PersistedEntry> = entries
        .iter()
        .map(|(key, entry)| {
            (
                key,
                PersistedEntry {
                    data: entry.value.clone(),
                    timestamp: to_epoch(entry.created_at),
                    access_count: entry.access_count,
                    last_accessed: to_epoch(entry.last_accessed),
                },
            )
        })
        .collect();

    let file = CacheFile {
        version: FORMAT_VERSION.to_string(),
        created: to_epoch(Utc::now()),
        entries: persisted
            .into_iter()
            .map(|(k, v)| (k.clone(), v))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, path).await?;

    debug!(
        "Saved {} cache entries to {}",
        entries.len(),
        path.display()
    );
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}
