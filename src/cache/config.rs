//! Configuration for the query cache

use crate::error::{LlmError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the persisted query cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Path of the persisted cache file
    pub cache_file: PathBuf,

    /// Maximum age of an entry before it is expired
    pub max_age: Duration,

    /// Maximum number of entries; older entries are evicted by last access
    pub max_entries: usize,

    /// Interval of the background flush task
    pub flush_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from(".graphwise_cache.json"),
            // Entries survive a day by default
            max_age: Duration::from_secs(24 * 3600),
            max_entries: 100,
            flush_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a new builder for cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(LlmError::Config(
                "max_entries must be greater than 0".to_string(),
            ));
        }

        if self.max_age.is_zero() {
            return Err(LlmError::Config(
                "max_age must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for cache configuration.
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    cache_file: Option<PathBuf>,
    max_age: Option<Duration>,
    max_entries: Option<usize>,
    flush_interval: Option<Duration>,
}

impl CacheConfigBuilder {
    /// Set the path of the persisted cache file.
    pub fn cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Set the maximum entry age.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Set the maximum number of entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Set the background flush interval.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    /// Build the cache configuration.
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();

        CacheConfig {
            cache_file: self.cache_file.unwrap_or(defaults.cache_file),
            max_age: self.max_age.unwrap_or(defaults.max_age),
            max_entries: self.max_entries.unwrap_or(defaults.max_entries),
            flush_interval: self.flush_interval.unwrap_or(defaults.flush_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_age, Duration::from_secs(24 * 3600));
        assert_eq!(config.max_entries, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CacheConfig::default();
        config.max_entries = 0;
        assert!(config.validate().is_err());

        let mut config = CacheConfig::default();
        config.max_age = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::builder()
            .cache_file("/tmp/test_cache.json")
            .max_age(Duration::from_secs(600))
            .max_entries(50)
            .build();

        assert_eq!(config.cache_file, PathBuf::from("/tmp/test_cache.json"));
        assert_eq!(config.max_age, Duration::from_secs(600));
        assert_eq!(config.max_entries, 50);
        assert_eq!(config.flush_interval, Duration::from_secs(60));
    }
}
