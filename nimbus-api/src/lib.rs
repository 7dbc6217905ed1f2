//! # Nimbus API Server
//!
//! HTTP surface over the cache-aside weather lookup.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /weather/current?city=&state=&country=&unit=` - Shaped current conditions
//! - `GET /weather/raw?city=&state=&country=&unit=` - Lookup result with the full provider document
//!
//! `/weather/current` has a per-client per-minute quota; the other routes
//! share a per-client hourly quota.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nimbus_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env()?;
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 5000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod rate_limit;
mod routes;
mod state;

pub use dto::{CurrentWeatherResponse, HealthResponse, WeatherQueryParams};
pub use error::ApiError;
pub use rate_limit::{RateLimitConfig, RateLimits};
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use nimbus_core::error::Result;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for Nimbus.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server, building the cache store and provider from `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_state(Arc::new(AppState::new(config)?)))
    }

    /// Creates a server over existing state.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            cache = self.state.lookup.cache_backend(),
            provider = self.state.lookup.provider_name(),
            "Nimbus API server listening on {}",
            addr
        );

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
