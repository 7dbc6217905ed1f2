//! API route configuration.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::handlers;
use crate::rate_limit::{limit_current, limit_default};
use crate::state::AppState;

/// Creates the API router with all routes and quotas configured.
///
/// `/weather/current` is charged only against its own per-minute quota; the
/// other routes share the default hourly quota.
pub fn create_router(state: Arc<AppState>) -> Router {
    let default_quota = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/weather/raw", get(handlers::raw_weather))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit_default));

    Router::new()
        .route(
            "/weather/current",
            get(handlers::current_weather)
                .layer(middleware::from_fn_with_state(state.clone(), limit_current)),
        )
        .merge(default_quota)
        .with_state(state)
}
