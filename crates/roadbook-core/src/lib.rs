pub mod error;
pub mod geometry;
pub mod models;
pub mod spatial;

pub use error::RouteError;
pub use geometry::RouteGeometry;
pub use models::{
    NewWaypoint, Route, Waypoint, WaypointType, WaypointUpdate, MIN_ROUTE_WAYPOINTS,
};
pub use spatial::{haversine_distance_km, leg_distance_km};
