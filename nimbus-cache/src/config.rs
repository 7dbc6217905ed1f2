//! Cache store configuration.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nimbus_core::constants::{
    DEFAULT_MEMORY_CACHE_ENTRIES, DEFAULT_REDIS_TIMEOUT_SECONDS, DEFAULT_REDIS_URL,
};
use nimbus_core::error::NimbusError;

/// Which store backs the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map; entries are lost on restart.
    Memory,
    /// Shared Redis server.
    Redis,
}

impl FromStr for CacheBackend {
    type Err = NimbusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            other => Err(NimbusError::ConfigError(format!(
                "unknown cache backend '{}' (expected 'memory' or 'redis')",
                other
            ))),
        }
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Store implementation to build
    pub backend: CacheBackend,
    /// Maximum number of entries (memory backend)
    pub max_entries: usize,
    /// Whether to drop expired entries before evicting live ones (memory backend)
    pub auto_cleanup: bool,
    /// Connection URL (redis backend)
    pub redis_url: String,
    /// Per-command timeout in seconds (redis backend)
    pub timeout_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            max_entries: DEFAULT_MEMORY_CACHE_ENTRIES,
            auto_cleanup: true,
            redis_url: DEFAULT_REDIS_URL.into(),
            timeout_seconds: DEFAULT_REDIS_TIMEOUT_SECONDS,
        }
    }
}

impl CacheConfig {
    /// In-memory store configuration.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Redis store configuration for the given URL.
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the per-command timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Per-command timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
