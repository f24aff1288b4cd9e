//! Typed errors surfaced by route and waypoint operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    /// Referenced route or waypoint does not exist, or the waypoint does not
    /// belong to the stated route.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input: coordinates out of range, missing fields, bad
    /// positions, too few waypoints at route creation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Caller is not the owner of the route being mutated.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Underlying storage failed; the enclosing transaction rolled back.
    #[error("storage error: {0}")]
    Persistence(String),
}

impl RouteError {
    pub fn not_found(what: impl Into<String>) -> Self {
        RouteError::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RouteError::Validation(message.into())
    }
}
