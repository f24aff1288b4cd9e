//! Core data models for routes and waypoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RouteError;

/// A route needs at least a start and an end point.
pub const MIN_ROUTE_WAYPOINTS: usize = 2;

/// Kind of stop a waypoint represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointType {
    Start,
    End,
    Waypoint,
    Poi,
    RestStop,
    GasStation,
    Viewpoint,
}

impl WaypointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaypointType::Start => "start",
            WaypointType::End => "end",
            WaypointType::Waypoint => "waypoint",
            WaypointType::Poi => "poi",
            WaypointType::RestStop => "rest_stop",
            WaypointType::GasStation => "gas_station",
            WaypointType::Viewpoint => "viewpoint",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(WaypointType::Start),
            "end" => Some(WaypointType::End),
            "waypoint" => Some(WaypointType::Waypoint),
            "poi" => Some(WaypointType::Poi),
            "rest_stop" => Some(WaypointType::RestStop),
            "gas_station" => Some(WaypointType::GasStation),
            "viewpoint" => Some(WaypointType::Viewpoint),
            _ => None,
        }
    }
}

/// An ordered stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub route_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Dense 1-based rank within the route's sequence.
    pub order_position: u32,
    pub waypoint_type: WaypointType,
    /// Kilometres from the previous waypoint; `None` at position 1.
    pub distance_from_previous: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    /// Planned stop duration in minutes.
    #[serde(default)]
    pub stop_duration_min: Option<u32>,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Informational link to a point of interest; not owned by the route.
    #[serde(default)]
    pub poi_id: Option<String>,
}

/// An ordered sequence of waypoints with a derived total distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Derived: sum of the waypoints' `distance_from_previous` values, in km.
    pub total_distance: f64,
    pub created_at: DateTime<Utc>,
}

impl Route {
    pub fn new(owner_id: &str, name: &str, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description,
            total_distance: 0.0,
            created_at: Utc::now(),
        }
    }

    /// Ownership precondition for every mutating operation. The caller's
    /// identity is passed in explicitly rather than read from ambient state.
    pub fn ensure_owned_by(&self, caller: &str) -> Result<(), RouteError> {
        if self.owner_id == caller {
            Ok(())
        } else {
            Err(RouteError::PermissionDenied(format!(
                "route {} is not owned by the caller",
                self.id
            )))
        }
    }
}

/// Input for a waypoint to be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWaypoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub waypoint_type: WaypointType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stop_duration_min: Option<u32>,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub poi_id: Option<String>,
}

impl NewWaypoint {
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.name.trim().is_empty() {
            return Err(RouteError::validation("waypoint name must not be empty"));
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// Partial update of a waypoint. `order_position` is not settable here; use
/// the reorder operation instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointUpdate {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub waypoint_type: Option<WaypointType>,
    pub description: Option<String>,
    pub stop_duration_min: Option<u32>,
    pub elevation_m: Option<f64>,
    pub notes: Option<String>,
    pub poi_id: Option<String>,
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), RouteError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(RouteError::Validation(format!(
            "latitude {} out of range [-90, 90]",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(RouteError::Validation(format!(
            "longitude {} out of range [-180, 180]",
            longitude
        )));
    }
    Ok(())
}
