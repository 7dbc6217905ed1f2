//! Cache stores for Nimbus weather records.
//!
//! Two implementations of [`CacheStore`]:
//!
//! - [`MemoryCacheStore`]: process-local map with per-entry TTL and a capacity cap
//! - [`RedisCacheStore`]: shared Redis server, entries written with `SETEX`
//!
//! Records are stored as their JSON text in both, so a value written by one
//! process can be read back by any other using the same backend.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod memory;
mod redis;

use std::sync::Arc;

use nimbus_core::error::Result;
use nimbus_core::traits::CacheStore;
use tracing::info;

pub use crate::config::{CacheBackend, CacheConfig};
pub use crate::memory::{CacheStats, MemoryCacheStore};
pub use crate::redis::RedisCacheStore;

/// Builds the store selected by `config.backend`.
///
/// Building a Redis store does not connect; an unreachable server surfaces
/// later as a [`CacheError`](nimbus_core::NimbusError::CacheError) on use.
pub fn build_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::with_config(config.clone())),
        CacheBackend::Redis => Arc::new(RedisCacheStore::with_config(config)?),
    };
    info!(backend = store.backend_name(), "Cache store ready");
    Ok(store)
}
