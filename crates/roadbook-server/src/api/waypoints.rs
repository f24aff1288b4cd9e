//! Waypoint mutation endpoints.
//!
//! Each handler takes the per-route lock, loads the current ordering, applies
//! the mutation in memory, and writes the resulting list back in one
//! transaction. Concurrent mutations of the same route serialize on the lock;
//! different routes proceed independently.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::auth;
use super::error::ApiError;
use super::routes::load_owned_route;
use crate::persistence::routes as route_store;
use crate::state::AppState;
use roadbook_core::{NewWaypoint, RouteGeometry, Waypoint, WaypointUpdate};

#[derive(Debug, Deserialize)]
pub struct AddWaypointRequest {
    #[serde(flatten)]
    pub waypoint: NewWaypoint,
    /// Omitted = append at the end of the route.
    #[serde(default)]
    pub position: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub position: u32,
}

/// Insert a waypoint into a route.
pub async fn add_waypoint(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(route_id): Path<String>,
    Json(req): Json<AddWaypointRequest>,
) -> Result<(StatusCode, Json<Waypoint>), ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;

    let lock = state.route_lock(&route_id);
    let _guard = lock.lock().await;

    load_owned_route(&state, &route_id, &caller).await?;
    let mut geometry = load_geometry(&state, &route_id).await?;
    let created = geometry.add(&route_id, req.waypoint, req.position)?;
    save_geometry(&state, &route_id, &geometry).await?;

    tracing::info!(
        "Added waypoint '{}' at position {} on route {}",
        created.name,
        created.order_position,
        route_id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a waypoint's fields. Position changes go through the
/// reorder endpoint.
pub async fn update_waypoint(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((route_id, waypoint_id)): Path<(String, String)>,
    Json(update): Json<WaypointUpdate>,
) -> Result<Json<Waypoint>, ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;

    let lock = state.route_lock(&route_id);
    let _guard = lock.lock().await;

    load_owned_route(&state, &route_id, &caller).await?;
    let mut geometry = load_geometry(&state, &route_id).await?;
    let updated = geometry.update(&waypoint_id, update)?;
    save_geometry(&state, &route_id, &geometry).await?;

    Ok(Json(updated))
}

/// Move a waypoint to a new position. Returns the full reordered list.
pub async fn reorder_waypoint(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((route_id, waypoint_id)): Path<(String, String)>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<Waypoint>>, ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;

    let lock = state.route_lock(&route_id);
    let _guard = lock.lock().await;

    load_owned_route(&state, &route_id, &caller).await?;
    let mut geometry = load_geometry(&state, &route_id).await?;
    geometry.reorder(&waypoint_id, req.position)?;
    save_geometry(&state, &route_id, &geometry).await?;

    tracing::info!(
        "Moved waypoint {} to position {} on route {}",
        waypoint_id,
        req.position,
        route_id
    );
    Ok(Json(geometry.into_waypoints()))
}

/// Remove a waypoint, closing the position gap.
pub async fn delete_waypoint(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((route_id, waypoint_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;

    let lock = state.route_lock(&route_id);
    let _guard = lock.lock().await;

    load_owned_route(&state, &route_id, &caller).await?;
    let mut geometry = load_geometry(&state, &route_id).await?;
    geometry.remove(&waypoint_id)?;
    save_geometry(&state, &route_id, &geometry).await?;

    tracing::info!("Deleted waypoint {} from route {}", waypoint_id, route_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn load_geometry(state: &AppState, route_id: &str) -> Result<RouteGeometry, ApiError> {
    let waypoints = route_store::load_waypoints(state.db().pool(), route_id).await?;
    Ok(RouteGeometry::from_waypoints(waypoints))
}

async fn save_geometry(
    state: &AppState,
    route_id: &str,
    geometry: &RouteGeometry,
) -> Result<(), ApiError> {
    route_store::replace_route_geometry(
        state.db().pool(),
        route_id,
        geometry.total_distance(),
        geometry.waypoints(),
    )
    .await?;
    Ok(())
}
