//! The provider's weather document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Raw weather payload as returned by the upstream provider.
///
/// The cache stores and returns it verbatim; only the HTTP boundary looks
/// inside, through the read-only accessors below.
///
/// Expected shape (fields beyond these are preserved untouched):
/// ```text
/// { "resolvedAddress": "...",
///   "currentConditions": { "temp", "conditions", "humidity", "windspeed", ... } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherRecord(Value);

impl WeatherRecord {
    /// Wraps a JSON document.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parses a record from its stored JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    /// Serializes the record to JSON text for storage.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Borrows the underlying document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the record, returning the underlying document.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The provider's resolved address, e.g. `"Alexandria, VA, United States"`.
    pub fn resolved_address(&self) -> Option<&str> {
        self.0.get("resolvedAddress").and_then(Value::as_str)
    }

    /// The `currentConditions` sub-document, if present.
    pub fn current_conditions(&self) -> Option<&Map<String, Value>> {
        self.0.get("currentConditions").and_then(Value::as_object)
    }

    /// A single field of `currentConditions` (e.g. `"temp"`), if present.
    pub fn current(&self, field: &str) -> Option<&Value> {
        self.current_conditions().and_then(|c| c.get(field))
    }
}

impl From<Value> for WeatherRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
