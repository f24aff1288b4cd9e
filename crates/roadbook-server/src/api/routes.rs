//! Route endpoints: creation with waypoints, reads, deletion.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth;
use super::error::ApiError;
use crate::persistence::routes as route_store;
use crate::state::AppState;
use roadbook_core::{NewWaypoint, Route, RouteError, RouteGeometry, Waypoint};

#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// At least a start and an end point, in ride order.
    pub waypoints: Vec<NewWaypoint>,
}

/// A route together with its ordered waypoints.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub route: Route,
    pub waypoints: Vec<Waypoint>,
}

/// Create a route from an ordered waypoint list.
pub async fn create_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<RouteResponse>), ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;

    if req.name.trim().is_empty() {
        return Err(RouteError::validation("route name must not be empty").into());
    }

    let mut route = Route::new(&caller, &req.name, req.description);
    let geometry = RouteGeometry::build(&route.id, req.waypoints)?;
    route.total_distance = geometry.total_distance();

    let waypoints = geometry.into_waypoints();
    route_store::insert_route_with_waypoints(state.db().pool(), &route, &waypoints).await?;

    tracing::info!(
        "Created route '{}' ({}) with {} waypoints, {:.2} km",
        route.name,
        route.id,
        waypoints.len(),
        route.total_distance
    );

    Ok((
        StatusCode::CREATED,
        Json(RouteResponse { route, waypoints }),
    ))
}

/// List the caller's routes.
pub async fn list_routes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Route>>, ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;
    let routes = route_store::load_routes_by_owner(state.db().pool(), &caller).await?;
    Ok(Json(routes))
}

/// Fetch one route with its ordered waypoints.
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(route_id): Path<String>,
) -> Result<Json<RouteResponse>, ApiError> {
    let route = route_store::load_route(state.db().pool(), &route_id)
        .await?
        .ok_or_else(|| RouteError::not_found(format!("route {}", route_id)))?;
    let waypoints = route_store::load_waypoints(state.db().pool(), &route_id).await?;

    Ok(Json(RouteResponse { route, waypoints }))
}

/// Delete a route and everything it owns.
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(route_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = auth::resolve_rider(&state, &headers).await?;

    let lock = state.route_lock(&route_id);
    let _guard = lock.lock().await;

    load_owned_route(&state, &route_id, &caller).await?;
    route_store::delete_route(state.db().pool(), &route_id).await?;
    state.forget_route_lock(&route_id);

    tracing::info!("Deleted route {}", route_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Load a route and check the caller owns it. Both the existence and the
/// ownership check run before any mutation is applied.
pub(crate) async fn load_owned_route(
    state: &AppState,
    route_id: &str,
    caller: &str,
) -> Result<Route, ApiError> {
    let route = route_store::load_route(state.db().pool(), route_id)
        .await?
        .ok_or_else(|| RouteError::not_found(format!("route {}", route_id)))?;
    route.ensure_owned_by(caller)?;
    Ok(route)
}
