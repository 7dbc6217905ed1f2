//! Location queries and the two strings derived from them.
//!
//! A query produces a cache key (namespace plus four components, lower-cased,
//! empty components kept) and an upstream location descriptor (comma-joined, original
//! casing, empty parts skipped). The two formats differ on purpose.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CACHE_KEY_DELIMITER, CACHE_KEY_NAMESPACE, DEFAULT_COUNTRY, DEFAULT_UNIT_GROUP,
    LOCATION_DESCRIPTOR_DELIMITER,
};

/// A request for current weather at one place.
///
/// Immutable once built; the `with_*` methods are only used while constructing.
/// Only the builder creates one, so an empty state is always stored as absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocationQuery {
    city: String,
    state: Option<String>,
    country: String,
    unit_group: String,
}

impl LocationQuery {
    /// Creates a query for `city` with default country and unit group.
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: None,
            country: DEFAULT_COUNTRY.into(),
            unit_group: DEFAULT_UNIT_GROUP.into(),
        }
    }

    /// Sets the state code. An empty string leaves the state absent.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        let state = state.into();
        self.state = if state.is_empty() { None } else { Some(state) };
        self
    }

    /// Sets the country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Sets the unit group (e.g. `"metric"` or `"us"`).
    pub fn with_unit_group(mut self, unit_group: impl Into<String>) -> Self {
        self.unit_group = unit_group.into();
        self
    }

    /// City as given.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// State code as given, if any.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Country as given.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Unit group as given.
    pub fn unit_group(&self) -> &str {
        &self.unit_group
    }

    /// Derives the cache key: `weather:{city}:{state}:{country}:{unit_group}`.
    ///
    /// All segments are lower-cased. A missing state is an empty segment and
    /// an empty country falls back to the default.
    pub fn cache_key(&self) -> CacheKey {
        let country = if self.country.is_empty() {
            DEFAULT_COUNTRY
        } else {
            self.country.as_str()
        };

        let segments = [
            CACHE_KEY_NAMESPACE.to_string(),
            self.city.to_lowercase(),
            self.state.as_deref().unwrap_or_default().to_lowercase(),
            country.to_lowercase(),
            self.unit_group.to_lowercase(),
        ];

        CacheKey(segments.join(&CACHE_KEY_DELIMITER.to_string()))
    }

    /// Builds the descriptor sent upstream, e.g. `"Alexandria,VA,US"`.
    ///
    /// Absent state and empty country are skipped, not emitted as empty parts.
    pub fn location_descriptor(&self) -> String {
        let mut parts = vec![self.city.as_str()];
        if let Some(state) = self.state.as_deref() {
            parts.push(state);
        }
        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }
        parts.join(&LOCATION_DESCRIPTOR_DELIMITER.to_string())
    }
}

/// Normalized cache key for one location query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
