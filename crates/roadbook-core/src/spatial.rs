//! Great-circle distance math for route legs.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate distance between two points in kilometres using the Haversine
/// formula.
///
/// This is the standard formula for great-circle distance between two points
/// on a sphere given their latitudes and longitudes. Identical points yield 0
/// and antipodal points fall out of the formula without special-casing.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in kilometres
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Round a distance to two decimals, the precision stored on waypoints.
pub fn round_km(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Leg distance between consecutive waypoints, at stored precision.
pub fn leg_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    round_km(haversine_distance_km(lat1, lon1, lat2, lon2))
}
