//! Rider identity for route ownership checks.
//!
//! Registration issues a bearer session token. Mutating handlers resolve the
//! token to a rider id and pass that id explicitly into the ownership check,
//! so no handler reads caller identity from ambient state.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;
use crate::persistence::riders;
use crate::state::AppState;
use roadbook_core::RouteError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub rider_id: Option<String>,
}

/// Register a rider and issue a session token.
pub async fn register_rider(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let rider_id = req
        .rider_id
        .unwrap_or_else(|| format!("rider-{}", Uuid::new_v4()));
    let token = Uuid::new_v4().to_string();

    riders::upsert_rider_token(state.db().pool(), &rider_id, &token).await?;
    tracing::info!("Registered rider {}", rider_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "rider_id": rider_id,
            "session_token": token,
        })),
    ))
}

/// Resolve the caller from the Authorization header.
///
/// Expected header format: `Authorization: Bearer <session_token>`
pub async fn resolve_rider(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(auth) if auth.starts_with("Bearer ") => auth.trim_start_matches("Bearer "),
        Some(_) => {
            return Err(ApiError(RouteError::PermissionDenied(
                "invalid Authorization header format, expected Bearer <token>".to_string(),
            )));
        }
        None => {
            return Err(ApiError(RouteError::PermissionDenied(
                "authorization required".to_string(),
            )));
        }
    };

    riders::find_rider_by_token(state.db().pool(), token)
        .await?
        .ok_or_else(|| ApiError(RouteError::PermissionDenied("unknown session token".to_string())))
}
