//! Service constants for Nimbus.
//!
//! The cache key layout and the provider defaults live here so that every
//! crate derives keys and URLs from the same values.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE KEY LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace token prefixed to every cache key.
pub const CACHE_KEY_NAMESPACE: &str = "weather";

/// Delimiter between cache key segments.
pub const CACHE_KEY_DELIMITER: char = ':';

/// Delimiter between parts of the upstream location descriptor.
pub const LOCATION_DESCRIPTOR_DELIMITER: char = ',';

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Country used when a query does not name one.
/// This is also the only country the HTTP boundary accepts.
pub const DEFAULT_COUNTRY: &str = "US";

/// Unit group used when a query does not name one.
pub const DEFAULT_UNIT_GROUP: &str = "metric";

/// Required length of a state code.
pub const STATE_CODE_LEN: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default lifetime of a cached weather record, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 600;

/// Default Redis connection URL.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

/// Default timeout applied to each Redis command, in seconds.
pub const DEFAULT_REDIS_TIMEOUT_SECONDS: u64 = 2;

/// Default capacity of the in-memory cache store.
pub const DEFAULT_MEMORY_CACHE_ENTRIES: usize = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM PROVIDER (Visual Crossing Timeline API)
// ═══════════════════════════════════════════════════════════════════════════════

/// Default Visual Crossing Timeline API base URL.
pub const DEFAULT_PROVIDER_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Default upstream request timeout, in seconds.
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;

/// Content type requested from the provider.
pub const PROVIDER_CONTENT_TYPE: &str = "json";

/// User agent sent to the provider.
pub const PROVIDER_USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_CACHE_TTL_SECONDS, 600);
        assert_eq!(DEFAULT_COUNTRY.len(), STATE_CODE_LEN);
        assert!(DEFAULT_PROVIDER_BASE_URL.starts_with("https://"));
        assert!(PROVIDER_USER_AGENT.starts_with("nimbus/"));
    }
}
