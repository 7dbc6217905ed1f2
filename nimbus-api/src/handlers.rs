//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use nimbus_core::types::LookupResult;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /weather/current
pub async fn current_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQueryParams>,
) -> Result<Json<CurrentWeatherResponse>> {
    let query = params.validate()?;

    info!(
        city = query.city(),
        state = query.state(),
        country = query.country(),
        unit = query.unit_group(),
        "Weather request"
    );

    let result = state.lookup.lookup(&query, true).await?;
    Ok(Json(CurrentWeatherResponse::from_lookup(&result, query.city())))
}

/// GET /weather/raw
pub async fn raw_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQueryParams>,
) -> Result<Json<LookupResult>> {
    let query = params.to_query()?;
    let result = state.lookup.lookup(&query, true).await?;
    Ok(Json(result))
}
