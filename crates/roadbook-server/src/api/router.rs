//! REST API routes.

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

use crate::api::{auth, routes, waypoints};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/riders/register", post(auth::register_rider))
        .route(
            "/v1/routes",
            post(routes::create_route).get(routes::list_routes),
        )
        .route(
            "/v1/routes/:route_id",
            get(routes::get_route).delete(routes::delete_route),
        )
        .route(
            "/v1/routes/:route_id/waypoints",
            post(waypoints::add_waypoint),
        )
        .route(
            "/v1/routes/:route_id/waypoints/:waypoint_id",
            put(waypoints::update_waypoint).delete(waypoints::delete_waypoint),
        )
        .route(
            "/v1/routes/:route_id/waypoints/:waypoint_id/reorder",
            post(waypoints::reorder_waypoint),
        )
}
