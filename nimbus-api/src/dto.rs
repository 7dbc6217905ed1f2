//! Request and response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nimbus_core::constants::{DEFAULT_COUNTRY, DEFAULT_UNIT_GROUP, STATE_CODE_LEN};
use nimbus_core::types::{LocationQuery, LookupResult, Source};

use crate::error::ApiError;

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH
// ═══════════════════════════════════════════════════════════════════════════════

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: String,
}

impl HealthResponse {
    /// Healthy response.
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════════════

/// Query parameters for GET /weather/current and GET /weather/raw
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQueryParams {
    /// City name (required)
    pub city: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// Country code; only `US` is accepted by /weather/current
    pub country: Option<String>,
    /// Unit group (`metric`, `us`, ...)
    pub unit: Option<String>,
}

/// Parameters after trimming and case normalization.
struct Normalized {
    city: String,
    state: Option<String>,
    country: String,
    unit: String,
}

impl WeatherQueryParams {
    fn normalize(&self) -> Result<Normalized, ApiError> {
        let city = self.city.as_deref().unwrap_or("").trim();
        if city.is_empty() {
            return Err(ApiError::bad_request("city is required"));
        }

        let state = self
            .state
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());

        let country = self
            .country
            .as_deref()
            .unwrap_or(DEFAULT_COUNTRY)
            .trim()
            .to_uppercase();

        let unit = match self.unit.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => DEFAULT_UNIT_GROUP.to_string(),
        };

        Ok(Normalized {
            city: city.to_string(),
            state,
            country,
            unit,
        })
    }

    /// Validates parameters for /weather/current.
    pub fn validate(&self) -> Result<LocationQuery, ApiError> {
        let params = self.normalize()?;

        if params.country != DEFAULT_COUNTRY {
            return Err(ApiError::bad_request(
                "Only US locations are supported right now",
            ));
        }

        if let Some(state) = &params.state {
            if state.chars().count() != STATE_CODE_LEN {
                return Err(ApiError::bad_request(
                    "state must be a 2-letter code like 'VA'",
                ));
            }
        }

        Ok(params.into_query())
    }

    /// Builds a query for /weather/raw. Only the city is required.
    pub fn to_query(&self) -> Result<LocationQuery, ApiError> {
        Ok(self.normalize()?.into_query())
    }
}

impl Normalized {
    fn into_query(self) -> LocationQuery {
        let mut query = LocationQuery::new(self.city)
            .with_country(self.country)
            .with_unit_group(self.unit);
        if let Some(state) = self.state {
            query = query.with_state(state);
        }
        query
    }
}

/// Response for GET /weather/current
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherResponse {
    /// Provider's resolved address, or the requested city
    pub city: String,
    /// Current temperature in the requested unit group
    pub temperature: Option<Value>,
    /// Textual conditions, e.g. "Partially cloudy"
    pub conditions: Option<Value>,
    /// Relative humidity
    pub humidity: Option<Value>,
    /// Wind speed
    pub wind_speed: Option<Value>,
    /// `cache` or `api`
    pub source: Source,
}

impl CurrentWeatherResponse {
    /// Shapes a lookup result; `requested_city` is used when the record has no resolved address.
    pub fn from_lookup(result: &LookupResult, requested_city: &str) -> Self {
        let record = &result.data;
        Self {
            city: record
                .resolved_address()
                .unwrap_or(requested_city)
                .to_string(),
            temperature: record.current("temp").cloned(),
            conditions: record.current("conditions").cloned(),
            humidity: record.current("humidity").cloned(),
            wind_speed: record.current("windspeed").cloned(),
            source: result.source,
        }
    }
}
