//! Weather lookup service.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use nimbus_cache::CacheConfig;
use nimbus_core::constants::DEFAULT_CACHE_TTL_SECONDS;
use nimbus_core::error::Result;
use nimbus_core::traits::{CacheStore, WeatherProvider};
use nimbus_core::types::{LocationQuery, LookupResult};
use nimbus_provider::{ProviderConfig, VisualCrossingClient};

/// Lookup service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Lifetime of records written to the cache, in seconds
    pub cache_ttl_seconds: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl LookupConfig {
    /// Sets the cache lifetime.
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    /// Cache lifetime as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

/// Answers current-weather requests from the cache, falling back to the
/// upstream provider.
///
/// Both collaborators are injected, so one service can be shared across
/// request handlers and tests can substitute doubles. Concurrent lookups for
/// the same location may both miss and both fetch; the later cache write wins.
pub struct WeatherLookupService {
    cache: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    config: LookupConfig,
}

impl WeatherLookupService {
    /// Creates a service from an existing store and provider.
    pub fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
        config: LookupConfig,
    ) -> Self {
        Self {
            cache,
            provider,
            config,
        }
    }

    /// Builds the configured cache store and a Visual Crossing client.
    pub fn from_config(
        cache: &CacheConfig,
        provider: ProviderConfig,
        config: LookupConfig,
    ) -> Result<Self> {
        let cache = nimbus_cache::build_store(cache)?;
        let provider = Arc::new(VisualCrossingClient::with_config(provider)?);
        Ok(Self::new(cache, provider, config))
    }

    /// Looks up current weather for `query`.
    ///
    /// With `use_cache`, a cached record is returned as-is with
    /// `source = "cache"` and the provider is not called. Otherwise (or on a
    /// miss) the provider is called with the comma-joined location
    /// descriptor; a fetched record is written back when `use_cache` is set.
    ///
    /// A failed cache read counts as a miss and a failed cache write is
    /// logged and ignored. Provider errors are returned unchanged.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let query = LocationQuery::new("Alexandria").with_state("VA");
    /// let result = service.lookup(&query, true).await?;
    /// println!("{} ({})", result.data.resolved_address().unwrap_or("?"), result.source);
    /// ```
    #[instrument(skip(self, query), fields(key = %query.cache_key()))]
    pub async fn lookup(&self, query: &LocationQuery, use_cache: bool) -> Result<LookupResult> {
        let key = query.cache_key();

        if use_cache {
            match self.cache.read(&key).await {
                Ok(Some(record)) => {
                    debug!("Cache hit");
                    return Ok(LookupResult::from_cache(record));
                }
                Ok(None) => debug!("Cache miss"),
                Err(e) => warn!(
                    backend = self.cache.backend_name(),
                    error = %e,
                    "Cache read failed, fetching from provider"
                ),
            }
        }

        let descriptor = query.location_descriptor();
        let record = self.provider.fetch(&descriptor, query.unit_group()).await?;

        info!(
            location = %descriptor,
            provider = self.provider.provider_name(),
            "Fetched current weather"
        );

        if use_cache {
            if let Err(e) = self.cache.write(&key, &record, self.config.cache_ttl()).await {
                warn!(
                    backend = self.cache.backend_name(),
                    error = %e,
                    "Cache write failed, returning uncached result"
                );
            }
        }

        Ok(LookupResult::from_api(record))
    }

    /// Name of the backing cache store.
    pub fn cache_backend(&self) -> &str {
        self.cache.backend_name()
    }

    /// Name of the upstream provider.
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nimbus_cache::MemoryCacheStore;
    use nimbus_core::error::NimbusError;
    use nimbus_core::types::{CacheKey, Source, WeatherRecord};
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Clone, Copy)]
    enum Outcome {
        Ok,
        BadRequest,
        ServerError,
    }

    /// Provider double that records every descriptor it is asked for.
    struct FakeProvider {
        outcome: Outcome,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeProvider {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch(&self, location: &str, unit_group: &str) -> Result<WeatherRecord> {
            self.calls
                .lock()
                .push((location.to_string(), unit_group.to_string()));
            match self.outcome {
                Outcome::Ok => Ok(sample_record(location)),
                Outcome::BadRequest => Err(NimbusError::invalid_location(location)),
                Outcome::ServerError => Err(NimbusError::UpstreamUnavailable("HTTP 503".into())),
            }
        }

        fn provider_name(&self) -> &str {
            "fake"
        }
    }

    /// Store double whose every operation fails.
    #[derive(Default)]
    struct BrokenStore {
        writes: Mutex<usize>,
    }

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn read(&self, _key: &CacheKey) -> Result<Option<WeatherRecord>> {
            Err(NimbusError::CacheError("connection refused".into()))
        }

        async fn write(&self, _key: &CacheKey, _record: &WeatherRecord, _ttl: Duration) -> Result<()> {
            *self.writes.lock() += 1;
            Err(NimbusError::CacheError("connection refused".into()))
        }

        fn backend_name(&self) -> &str {
            "broken"
        }
    }

    fn sample_record(location: &str) -> WeatherRecord {
        WeatherRecord::new(json!({
            "resolvedAddress": location,
            "currentConditions": {
                "temp": 21.0,
                "conditions": "Clear",
                "humidity": 48.0,
                "windspeed": 7.6
            }
        }))
    }

    fn alexandria() -> LocationQuery {
        LocationQuery::new("Alexandria")
            .with_state("VA")
            .with_country("US")
            .with_unit_group("metric")
    }

    fn service_with(
        store: Arc<MemoryCacheStore>,
        provider: Arc<FakeProvider>,
    ) -> WeatherLookupService {
        WeatherLookupService::new(store, provider, LookupConfig::default())
    }

    #[tokio::test]
    async fn test_miss_fetches_and_populates_cache() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::Ok);
        let service = service_with(store.clone(), provider.clone());

        let result = service.lookup(&alexandria(), true).await.unwrap();

        assert_eq!(result.source, Source::Api);
        assert_eq!(
            provider.calls(),
            vec![("Alexandria,VA,US".to_string(), "metric".to_string())]
        );
        let key = alexandria().cache_key();
        assert_eq!(key.as_str(), "weather:alexandria:va:us:metric");
        let cached = store.read(&key).await.unwrap().unwrap();
        assert_eq!(cached, result.data);
    }

    #[tokio::test]
    async fn test_repeat_lookup_is_served_from_cache() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::Ok);
        let service = service_with(store, provider.clone());

        let first = service.lookup(&alexandria(), true).await.unwrap();
        let second = service.lookup(&alexandria(), true).await.unwrap();

        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.data, first.data);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_case_variants_share_cache_entry() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::Ok);
        let service = service_with(store, provider.clone());

        service.lookup(&alexandria(), true).await.unwrap();
        let shouted = LocationQuery::new("ALEXANDRIA")
            .with_state("va")
            .with_country("us")
            .with_unit_group("METRIC");
        let result = service.lookup(&shouted, true).await.unwrap();

        assert!(result.is_cache_hit());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_location_writes_nothing() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::BadRequest);
        let service = service_with(store.clone(), provider.clone());

        let query = LocationQuery::new("Nowhereville");
        let err = service.lookup(&query, true).await.unwrap_err();

        match err {
            NimbusError::InvalidLocation { location } => assert_eq!(location, "Nowhereville,US"),
            other => panic!("expected InvalidLocation, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::ServerError);
        let service = service_with(store.clone(), provider);

        let err = service.lookup(&alexandria(), true).await.unwrap_err();
        assert!(matches!(err, NimbusError::UpstreamUnavailable(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials_make_no_network_call() {
        // Unreachable endpoint: any attempted request would surface as UpstreamUnavailable.
        let provider = ProviderConfig {
            base_url: "http://127.0.0.1:1/timeline".into(),
            api_key: None,
            timeout_seconds: 1,
        };
        let service =
            WeatherLookupService::from_config(&CacheConfig::memory(), provider, LookupConfig::default())
                .unwrap();

        let err = service.lookup(&alexandria(), true).await.unwrap_err();
        assert!(matches!(err, NimbusError::NotConfigured(_)), "{:?}", err);
        assert_eq!(service.cache_backend(), "memory");
        assert_eq!(service.provider_name(), "visual-crossing");
    }

    #[tokio::test]
    async fn test_bypass_skips_read_and_write() {
        let store = Arc::new(MemoryCacheStore::new());
        let stale = sample_record("stale");
        store
            .write(&alexandria().cache_key(), &stale, Duration::from_secs(60))
            .await
            .unwrap();
        let provider = FakeProvider::new(Outcome::Ok);
        let service = service_with(store.clone(), provider.clone());

        let result = service.lookup(&alexandria(), false).await.unwrap();

        assert_eq!(result.source, Source::Api);
        assert_eq!(provider.calls().len(), 1);
        let cached = store.read(&alexandria().cache_key()).await.unwrap().unwrap();
        assert_eq!(cached, stale);
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_uncached() {
        let store = Arc::new(BrokenStore::default());
        let provider = FakeProvider::new(Outcome::Ok);
        let service =
            WeatherLookupService::new(store.clone(), provider.clone(), LookupConfig::default());

        let result = tokio_test::assert_ok!(service.lookup(&alexandria(), true).await);

        assert_eq!(result.source, Source::Api);
        assert_eq!(provider.calls().len(), 1);
        assert_eq!(*store.writes.lock(), 1);
    }

    #[tokio::test]
    async fn test_descriptor_omits_absent_state() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::Ok);
        let service = service_with(store.clone(), provider.clone());

        let query = LocationQuery::new("Boston").with_unit_group("us");
        service.lookup(&query, true).await.unwrap();

        assert_eq!(
            provider.calls(),
            vec![("Boston,US".to_string(), "us".to_string())]
        );
        assert!(store
            .read(&query.cache_key())
            .await
            .unwrap()
            .is_some());
        assert_eq!(query.cache_key().as_str(), "weather:boston::us:us");
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let store = Arc::new(MemoryCacheStore::new());
        let provider = FakeProvider::new(Outcome::Ok);
        let service = WeatherLookupService::new(
            store,
            provider.clone(),
            LookupConfig::default().with_cache_ttl_seconds(0),
        );

        service.lookup(&alexandria(), true).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let result = service.lookup(&alexandria(), true).await.unwrap();

        assert_eq!(result.source, Source::Api);
        assert_eq!(provider.calls().len(), 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }
}
