//! In-memory TTL cache store for weather records.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use nimbus_core::error::{NimbusError, Result};
use nimbus_core::traits::CacheStore;
use nimbus_core::types::{CacheKey, WeatherRecord};

use crate::config::CacheConfig;

/// Cache entry with TTL. Holds the JSON text, the same form Redis stores.
#[derive(Clone)]
struct CacheEntry {
    payload: String,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// In-memory cache store.
///
/// Thread-safe and supports TTL-based expiration. Expired entries read as
/// misses and are dropped on cleanup or when capacity is reached.
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: CacheConfig,
}

impl MemoryCacheStore {
    /// Creates a new store with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a store with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(config.max_entries)),
            config,
        }
    }

    /// Removes a cached entry.
    pub fn remove(&self, key: &CacheKey) {
        self.entries.write().remove(key.as_str());
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        self.entries.write().retain(|_, e| !e.is_expired());
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            capacity: self.config.max_entries,
        }
    }

    fn insert(&self, key: &CacheKey, payload: String, ttl: Duration) {
        let mut entries = self.entries.write();

        if self.config.auto_cleanup && entries.len() >= self.config.max_entries {
            entries.retain(|_, e| !e.is_expired());
        }
        if entries.len() >= self.config.max_entries && !entries.contains_key(key.as_str()) {
            if let Some(oldest_key) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest_key);
            }
        }

        entries.insert(
            key.as_str().to_string(),
            CacheEntry {
                payload,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn read(&self, key: &CacheKey) -> Result<Option<WeatherRecord>> {
        let payload = {
            let entries = self.entries.read();
            match entries.get(key.as_str()) {
                Some(e) if !e.is_expired() => Some(e.payload.clone()),
                Some(_) => {
                    debug!("Entry expired");
                    None
                }
                None => None,
            }
        };

        payload
            .map(|json| {
                WeatherRecord::from_json_str(&json)
                    .map_err(|e| NimbusError::CacheError(format!("failed to decode entry: {}", e)))
            })
            .transpose()
    }

    #[instrument(skip(self, key, record, ttl), fields(key = %key, ttl_secs = ttl.as_secs()))]
    async fn write(&self, key: &CacheKey, record: &WeatherRecord, ttl: Duration) -> Result<()> {
        let payload = record
            .to_json_string()
            .map_err(|e| NimbusError::CacheError(format!("failed to encode entry: {}", e)))?;
        self.insert(key, payload, ttl);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Entries currently held
    pub total_entries: usize,
    /// Entries past their TTL but not yet dropped
    pub expired_entries: usize,
    /// Entries that would be served
    pub valid_entries: usize,
    /// Configured maximum
    pub capacity: usize,
}
