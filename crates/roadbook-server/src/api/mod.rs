//! REST API for routes and waypoints.

pub mod auth;
pub mod error;
mod router;
pub mod routes;
pub mod waypoints;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    router::create_router()
}
