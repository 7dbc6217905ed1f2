//! # Nimbus Lookup
//!
//! The cache-aside retrieval path: derive a cache key from a location
//! query, try the cache, fall back to the upstream provider on a miss, and
//! write the fetched record back with the configured lifetime.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod service;

pub use nimbus_cache::{CacheBackend, CacheConfig};
pub use nimbus_provider::ProviderConfig;
pub use service::{LookupConfig, WeatherLookupService};
