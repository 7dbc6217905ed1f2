//! Error types for Nimbus.
//!
//! The upstream provider classifies every failure into one of a few kinds and
//! the lookup service forwards them unchanged, so callers can map each kind to
//! a response without inspecting messages.

use thiserror::Error;

/// Result type alias using `NimbusError`.
pub type Result<T> = std::result::Result<T, NimbusError>;

/// Main error type for all Nimbus operations.
#[derive(Debug, Error)]
pub enum NimbusError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CALLER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Caller input is malformed. Raised at the boundary, never by the core.
    #[error("{0}")]
    ValidationError(String),

    /// The provider rejected the location as malformed or unresolvable.
    #[error("Invalid location '{location}' or bad request")]
    InvalidLocation {
        /// The location descriptor sent upstream
        location: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The provider signaled a server-side failure or could not be reached.
    #[error("Upstream weather service is unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Required provider credentials are absent.
    #[error("{0} is not configured")]
    NotConfigured(String),

    /// Any other upstream failure: timeout, malformed body, unexpected status.
    #[error("Unexpected upstream error: {0}")]
    Unclassified(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The cache store failed to read or write an entry.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // DEPLOYMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration value present but unusable.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl NimbusError {
    /// Creates an `InvalidLocation` error for the given descriptor.
    pub fn invalid_location(location: impl Into<String>) -> Self {
        NimbusError::InvalidLocation {
            location: location.into(),
        }
    }

    /// Returns true if the caller sent something the service cannot answer.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NimbusError::ValidationError(_) | NimbusError::InvalidLocation { .. }
        )
    }

    /// Returns true if the service cannot answer right now through no fault
    /// of the caller (upstream outage or missing deployment configuration).
    pub fn is_service_unavailable(&self) -> bool {
        matches!(
            self,
            NimbusError::UpstreamUnavailable(_) | NimbusError::NotConfigured(_)
        )
    }

    /// Returns true if this error came from the cache store.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, NimbusError::CacheError(_))
    }
}
