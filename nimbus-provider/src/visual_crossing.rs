//! Visual Crossing Timeline API client.
//!
//! Requests `GET {base_url}/{location}?unitGroup=..&key=..&contentType=json`
//! and returns the response document untouched.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use nimbus_core::constants::{
    DEFAULT_PROVIDER_BASE_URL, DEFAULT_PROVIDER_TIMEOUT_SECONDS, PROVIDER_CONTENT_TYPE,
    PROVIDER_USER_AGENT,
};
use nimbus_core::error::{NimbusError, Result};
use nimbus_core::traits::WeatherProvider;
use nimbus_core::types::WeatherRecord;

/// Provider client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Timeline API base URL, without a trailing location segment
    pub base_url: String,
    /// API key; lookups fail with `NotConfigured` while absent
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_BASE_URL.into(),
            api_key: None,
            timeout_seconds: DEFAULT_PROVIDER_TIMEOUT_SECONDS,
        }
    }
}

impl ProviderConfig {
    /// Creates config with the given API key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the base URL (used to point at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Returns true if a non-empty API key is set.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Visual Crossing weather client.
pub struct VisualCrossingClient {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl VisualCrossingClient {
    /// Creates a client with default endpoint and the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ProviderConfig::new(api_key))
    }

    /// Creates a client with the given config.
    ///
    /// A missing API key is not an error here; it is reported per lookup.
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(PROVIDER_USER_AGENT)
            .build()
            .map_err(|e| NimbusError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        if !config.has_api_key() {
            warn!("Visual Crossing API key not set; lookups will fail until it is configured");
        }

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Builds the request URL. The location becomes one percent-encoded path segment.
    pub(crate) fn request_url(&self, location: &str, unit_group: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            NimbusError::ConfigError(format!(
                "invalid provider base URL '{}': {}",
                self.config.base_url, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                NimbusError::ConfigError(format!(
                    "provider base URL '{}' cannot take a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(location);

        url.query_pairs_mut()
            .append_pair("unitGroup", unit_group)
            .append_pair("key", key)
            .append_pair("contentType", PROVIDER_CONTENT_TYPE);

        Ok(url)
    }
}

/// Maps a non-success status onto the error taxonomy.
fn classify_status(status: StatusCode, location: &str) -> NimbusError {
    if status == StatusCode::BAD_REQUEST {
        NimbusError::invalid_location(location)
    } else if status.is_server_error() {
        NimbusError::UpstreamUnavailable(format!("HTTP {}", status))
    } else {
        NimbusError::Unclassified(format!("unexpected status HTTP {}", status))
    }
}

/// Maps a transport failure onto the error taxonomy.
fn classify_transport(err: reqwest::Error) -> NimbusError {
    if err.is_timeout() {
        NimbusError::Unclassified(format!("request timed out: {}", err.without_url()))
    } else if err.is_connect() {
        NimbusError::UpstreamUnavailable(format!("connection failed: {}", err.without_url()))
    } else {
        NimbusError::Unclassified(format!("request failed: {}", err.without_url()))
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingClient {
    #[instrument(skip(self))]
    async fn fetch(&self, location: &str, unit_group: &str) -> Result<WeatherRecord> {
        let key = match self.config.api_key.as_deref() {
            Some(k) if !k.is_empty() => k,
            _ => return Err(NimbusError::NotConfigured("Visual Crossing API key".into())),
        };

        let url = self.request_url(location, unit_group, key)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Provider returned error status");
            return Err(classify_status(status, location));
        }

        let body = response
            .text()
            .await
            .map_err(classify_transport)?;

        let record = WeatherRecord::from_json_str(&body)
            .map_err(|e| NimbusError::Unclassified(format!("malformed response body: {}", e)))?;

        debug!(resolved = record.resolved_address(), "Fetched weather");
        Ok(record)
    }

    fn provider_name(&self) -> &str {
        "visual-crossing"
    }
}

impl fmt::Debug for VisualCrossingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualCrossingClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        json!({
            "resolvedAddress": "Alexandria, VA, United States",
            "currentConditions": {
                "temp": 18.2,
                "conditions": "Overcast",
                "humidity": 71.5,
                "windspeed": 9.4
            }
        })
    }

    fn client_for(server: &MockServer) -> VisualCrossingClient {
        let config = ProviderConfig::new("test-key")
            .with_base_url(format!("{}/timeline", server.uri()))
            .with_timeout_seconds(1);
        VisualCrossingClient::with_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/Alexandria,VA,US"))
            .and(query_param("unitGroup", "metric"))
            .and(query_param("key", "test-key"))
            .and(query_param("contentType", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server)
            .fetch("Alexandria,VA,US", "metric")
            .await
            .unwrap();

        assert_eq!(record.as_value(), &sample_body());
        assert_eq!(record.resolved_address(), Some("Alexandria, VA, United States"));
    }

    #[tokio::test]
    async fn test_bad_request_is_invalid_location() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad API Request:Invalid location parameter value."))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Nowhereville,US", "metric")
            .await
            .unwrap_err();

        match err {
            NimbusError::InvalidLocation { location } => assert_eq!(location, "Nowhereville,US"),
            other => panic!("expected InvalidLocation, got {:?}", other),
        }
    }

    #[test_case(500 ; "internal server error")]
    #[test_case(502 ; "bad gateway")]
    #[test_case(503 ; "service unavailable")]
    #[tokio::test]
    async fn test_server_error_is_unavailable(status: u16) {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Alexandria,VA,US", "metric")
            .await
            .unwrap_err();
        assert!(matches!(err, NimbusError::UpstreamUnavailable(_)), "{:?}", err);
    }

    #[test_case(401 ; "unauthorized")]
    #[test_case(404 ; "not found")]
    #[test_case(429 ; "too many requests")]
    #[tokio::test]
    async fn test_other_status_is_unclassified(status: u16) {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Alexandria,VA,US", "metric")
            .await
            .unwrap_err();
        assert!(matches!(err, NimbusError::Unclassified(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unclassified() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Alexandria,VA,US", "metric")
            .await
            .unwrap_err();
        assert!(matches!(err, NimbusError::Unclassified(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_timeout_is_unclassified() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Alexandria,VA,US", "metric")
            .await
            .unwrap_err();
        assert!(matches!(err, NimbusError::Unclassified(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let config = ProviderConfig::new("test-key")
            .with_base_url("http://127.0.0.1:1/timeline")
            .with_timeout_seconds(2);
        let client = VisualCrossingClient::with_config(config).unwrap();

        let err = client.fetch("Alexandria,VA,US", "metric").await.unwrap_err();
        assert!(matches!(err, NimbusError::UpstreamUnavailable(_)), "{:?}", err);
    }

    #[test_case(None ; "absent")]
    #[test_case(Some("") ; "empty")]
    #[tokio::test]
    async fn test_missing_key_makes_no_request(key: Option<&str>) {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(0)
            .mount(&server)
            .await;

        let config = ProviderConfig {
            base_url: format!("{}/timeline", server.uri()),
            api_key: key.map(String::from),
            timeout_seconds: 1,
        };
        let client = VisualCrossingClient::with_config(config).unwrap();

        let err = client.fetch("Alexandria,VA,US", "metric").await.unwrap_err();
        assert!(matches!(err, NimbusError::NotConfigured(_)), "{:?}", err);
    }

    #[test]
    fn test_request_url_encoding() {
        let client = VisualCrossingClient::new("k").unwrap();
        let url = client.request_url("New York,NY,US", "us", "k").unwrap();
        assert_eq!(
            url.as_str(),
            "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/New%20York,NY,US?unitGroup=us&key=k&contentType=json"
        );
    }

    #[test]
    fn test_request_url_trailing_slash() {
        let config = ProviderConfig::new("k").with_base_url("http://localhost:9000/timeline/");
        let client = VisualCrossingClient::with_config(config).unwrap();
        let url = client.request_url("Boston,US", "metric", "k").unwrap();
        assert_eq!(url.path(), "/timeline/Boston,US");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ProviderConfig::new("k").with_base_url("not a url");
        let client = VisualCrossingClient::with_config(config).unwrap();
        let err = client.request_url("Boston,US", "metric", "k").unwrap_err();
        assert!(matches!(err, NimbusError::ConfigError(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
