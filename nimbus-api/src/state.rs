//! App state: lookup service, rate limits, config.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nimbus_cache::{CacheBackend, CacheConfig};
use nimbus_core::constants::{
    DEFAULT_CACHE_TTL_SECONDS, DEFAULT_PROVIDER_BASE_URL, DEFAULT_PROVIDER_TIMEOUT_SECONDS,
    DEFAULT_REDIS_URL,
};
use nimbus_core::error::{NimbusError, Result};
use nimbus_lookup::{LookupConfig, WeatherLookupService};
use nimbus_provider::ProviderConfig;

use crate::rate_limit::{RateLimitConfig, RateLimits};

/// Server configuration.
///
/// `Default` uses the in-memory cache and no API key; [`ApiConfig::from_env`]
/// reads the deployment settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Upstream provider settings
    pub provider: ProviderConfig,
    /// Cache store settings
    pub cache: CacheConfig,
    /// Lookup settings (cache lifetime)
    pub lookup: LookupConfig,
    /// Per-client quotas
    pub rate_limit: RateLimitConfig,
}

impl ApiConfig {
    /// Loads configuration from the environment, honoring a `.env` file.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `VISUAL_CROSSING_API_KEY` | unset |
    /// | `VISUAL_CROSSING_BASE_URL` | Timeline API |
    /// | `UPSTREAM_TIMEOUT_SECONDS` | 10 |
    /// | `CACHE_TTL_SECONDS` | 600 |
    /// | `CACHE_BACKEND` | `redis` |
    /// | `REDIS_URL` | `redis://localhost:6379/0` |
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds configuration from a variable lookup function.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = var("VISUAL_CROSSING_API_KEY").filter(|k| !k.trim().is_empty());

        let provider = ProviderConfig {
            base_url: var("VISUAL_CROSSING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.into()),
            api_key,
            timeout_seconds: parse_var(
                &var,
                "UPSTREAM_TIMEOUT_SECONDS",
                DEFAULT_PROVIDER_TIMEOUT_SECONDS,
            )?,
        };

        let backend = match var("CACHE_BACKEND") {
            Some(v) => v.parse::<CacheBackend>()?,
            None => CacheBackend::Redis,
        };
        let cache = CacheConfig {
            backend,
            redis_url: var("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.into()),
            ..CacheConfig::default()
        };

        let lookup = LookupConfig::default().with_cache_ttl_seconds(parse_var(
            &var,
            "CACHE_TTL_SECONDS",
            DEFAULT_CACHE_TTL_SECONDS,
        )?);

        Ok(Self {
            provider,
            cache,
            lookup,
            rate_limit: RateLimitConfig::default(),
        })
    }

    /// Replaces the rate-limit quotas.
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T> {
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            NimbusError::ConfigError(format!("{} must be a non-negative integer, got '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

/// Shared state handed to every handler.
pub struct AppState {
    /// Active configuration
    pub config: ApiConfig,
    /// Cache-aside lookup service
    pub lookup: WeatherLookupService,
    /// Per-client quotas
    pub limits: RateLimits,
}

impl AppState {
    /// Builds the cache store and provider client named by `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let lookup = WeatherLookupService::from_config(
            &config.cache,
            config.provider.clone(),
            config.lookup.clone(),
        )?;
        Ok(Self::with_lookup(config, lookup))
    }

    /// Uses an already-built lookup service.
    pub fn with_lookup(config: ApiConfig, lookup: WeatherLookupService) -> Self {
        let limits = RateLimits::new(&config.rate_limit);
        Self {
            config,
            lookup,
            limits,
        }
    }
}
