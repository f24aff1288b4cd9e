//! Maps engine errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roadbook_core::RouteError;
use serde_json::json;

pub struct ApiError(pub RouteError);

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("storage operation failed: {:#}", err);
        ApiError(RouteError::Persistence(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RouteError::NotFound(_) => StatusCode::NOT_FOUND,
            RouteError::Validation(_) => StatusCode::BAD_REQUEST,
            RouteError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            RouteError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the logs.
        let message = match &self.0 {
            RouteError::Persistence(_) => "internal storage error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
