//! Common traits for Nimbus.
//!
//! The lookup service talks to its collaborators only through these traits,
//! so stores and providers can be swapped for test doubles.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CacheKey, WeatherRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key/value store with expiring entries holding fetched weather records.
///
/// Implementations might use:
/// - In-memory storage (for testing/single-process deployments)
/// - Redis (for shared deployments)
///
/// Each individual `read` or `write` must be atomic; callers do no locking.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the record stored under `key`.
    ///
    /// Returns `Ok(None)` on a clean miss (absent or expired) and
    /// `Err(NimbusError::CacheError)` when the store itself failed.
    async fn read(&self, key: &CacheKey) -> Result<Option<WeatherRecord>>;

    /// Upserts `record` under `key`, resetting its remaining lifetime to `ttl`.
    async fn write(&self, key: &CacheKey, record: &WeatherRecord, ttl: Duration) -> Result<()>;

    /// Short backend name used in logs.
    fn backend_name(&self) -> &str;
}

// ═══════════════════════════════════════════════════════════════════════════════
// WEATHER PROVIDER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Upstream source of current weather.
///
/// Failures are classified before they leave the provider:
/// `InvalidLocation`, `UpstreamUnavailable`, `NotConfigured`, or `Unclassified`.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetches the raw weather document for a location descriptor
    /// (e.g. `"Alexandria,VA,US"`) in the given unit group.
    async fn fetch(&self, location: &str, unit_group: &str) -> Result<WeatherRecord>;

    /// Short provider name used in logs.
    fn provider_name(&self) -> &str;
}
