//! API route handlers.
//!
//! Every handler is a thin mapping from query string to `resolve`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use explorer_core::types::{Record, ResourceKind};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /location?data=<search>
///
/// Returns the location object, or `null` when the provider found nothing.
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Option<Record>>> {
    let key = query.into_lookup()?;
    let resolution = state
        .orchestrator
        .resolve(ResourceKind::Location, &key)
        .await?;

    debug!(source = ?resolution.source, "Resolved location");
    Ok(Json(resolution.into_records().into_iter().next()))
}

async fn resolve_dependent(
    state: &AppState,
    kind: ResourceKind,
    params: LocationParams,
) -> Result<Json<Vec<Record>>> {
    let key = params.into_lookup()?;
    let resolution = state.orchestrator.resolve(kind, &key).await?;

    debug!(%kind, source = ?resolution.source, count = resolution.records.len(), "Resolved");
    Ok(Json(resolution.into_records()))
}

/// GET /weather
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<Record>>> {
    resolve_dependent(&state, ResourceKind::Weather, params).await
}

/// GET /events
pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<Record>>> {
    resolve_dependent(&state, ResourceKind::Event, params).await
}

/// GET /movies
pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<Record>>> {
    resolve_dependent(&state, ResourceKind::Movie, params).await
}

/// GET /yelp
pub async fn get_yelp(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<Record>>> {
    resolve_dependent(&state, ResourceKind::Yelp, params).await
}

/// GET /trails
pub async fn get_trails(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<Record>>> {
    resolve_dependent(&state, ResourceKind::Trail, params).await
}

/// GET /stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let counters = state.orchestrator.stats();
    Json(StatsResponse {
        hit_rate: counters.hit_rate(),
        in_flight: state.orchestrator.in_flight(),
        counters,
    })
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.uptime().as_secs(),
    })
}
