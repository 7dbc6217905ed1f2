//! Lookup results and their provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::WeatherRecord;

/// Where a lookup result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from the cache store.
    Cache,
    /// Fetched live from the upstream provider.
    Api,
}

impl Source {
    /// Wire name: `"cache"` or `"api"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Api => "api",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope returned by every successful lookup.
///
/// Serializes as `{ "source": "cache" | "api", "data": { ... } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Provenance of `data`
    pub source: Source,
    /// The weather record
    pub data: WeatherRecord,
}

impl LookupResult {
    /// A result served from the cache.
    pub fn from_cache(data: WeatherRecord) -> Self {
        Self {
            source: Source::Cache,
            data,
        }
    }

    /// A result fetched from the upstream provider.
    pub fn from_api(data: WeatherRecord) -> Self {
        Self {
            source: Source::Api,
            data,
        }
    }

    /// Returns true if the cache satisfied the request.
    pub fn is_cache_hit(&self) -> bool {
        self.source == Source::Cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_value(Source::Cache).unwrap(), json!("cache"));
        assert_eq!(serde_json::to_value(Source::Api).unwrap(), json!("api"));
        assert_eq!(Source::Api.to_string(), "api");
    }

    #[test]
    fn test_lookup_result_shape() {
        let result = LookupResult::from_api(WeatherRecord::new(json!({ "resolvedAddress": "Boston" })));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({ "source": "api", "data": { "resolvedAddress": "Boston" } })
        );
        assert!(!result.is_cache_hit());
    }

    #[test]
    fn test_cache_hit() {
        let result = LookupResult::from_cache(WeatherRecord::new(json!({})));
        assert!(result.is_cache_hit());
    }
}
