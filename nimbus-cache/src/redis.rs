//! Redis cache store.
//!
//! Entries are stored with `SETEX` as the record's JSON text, so Redis owns
//! expiry. Every command is bounded by the configured timeout.
//!
//! One [`ConnectionManager`] is opened lazily on first use and shared by all
//! clones of the store. It reconnects on its own after the link drops.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use nimbus_core::error::{NimbusError, Result};
use nimbus_core::traits::CacheStore;
use nimbus_core::types::{CacheKey, WeatherRecord};

use crate::config::CacheConfig;

/// Redis-backed cache store.
///
/// No connection is made until the first command. A failed connect leaves the
/// store unconnected, so the next command tries again.
#[derive(Clone)]
pub struct RedisCacheStore {
    client: Client,
    conn: Arc<OnceCell<ConnectionManager>>,
    url: String,
    timeout: Duration,
}

impl RedisCacheStore {
    /// Creates a store for the given connection URL (e.g. `redis://localhost:6379/0`).
    ///
    /// Only the URL is validated here; no connection is made.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(&CacheConfig::redis(url))
    }

    /// Creates a store from configuration.
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        let client = Client::open(config.redis_url.as_str()).map_err(|e| {
            NimbusError::ConfigError(format!("invalid Redis URL '{}': {}", config.redis_url, e))
        })?;

        Ok(Self {
            client,
            conn: Arc::new(OnceCell::new()),
            url: config.redis_url.clone(),
            timeout: config.timeout(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .conn
            .get_or_try_init(|| {
                debug!(url = %self.url, "Connecting to Redis");
                self.bounded("connect", ConnectionManager::new(self.client.clone()))
            })
            .await?;
        Ok(manager.clone())
    }

    /// Whether the shared connection has been established.
    pub fn is_connected(&self) -> bool {
        self.conn.initialized()
    }

    async fn bounded<T>(
        &self,
        op: &str,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(NimbusError::CacheError(format!("Redis {} failed: {}", op, e))),
            Err(_) => Err(NimbusError::CacheError(format!(
                "Redis {} timed out after {:?}",
                op, self.timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn read(&self, key: &CacheKey) -> Result<Option<WeatherRecord>> {
        let mut conn = self.connection().await?;
        let cached: Option<String> = self.bounded("GET", conn.get(key.as_str())).await?;

        match cached {
            Some(json) => {
                let record = WeatherRecord::from_json_str(&json).map_err(|e| {
                    NimbusError::CacheError(format!("failed to decode entry: {}", e))
                })?;
                Ok(Some(record))
            }
            None => {
                debug!("Key not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, key, record, ttl), fields(key = %key, ttl_secs = ttl.as_secs()))]
    async fn write(&self, key: &CacheKey, record: &WeatherRecord, ttl: Duration) -> Result<()> {
        let payload = record
            .to_json_string()
            .map_err(|e| NimbusError::CacheError(format!("failed to encode entry: {}", e)))?;

        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.connection().await?;
        self.bounded::<()>("SETEX", conn.set_ex(key.as_str(), payload, seconds))
            .await
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}

impl fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
