//! Waypoint ordering and distance maintenance for a single route.
//!
//! Every mutation works on the full in-memory ordered list and leaves it with
//! dense 1-based positions and consistent leg distances. Callers persist the
//! resulting list as one atomic write, so no partial reordering is ever
//! visible to readers.

use uuid::Uuid;

use crate::error::RouteError;
use crate::models::{NewWaypoint, Waypoint, WaypointUpdate, MIN_ROUTE_WAYPOINTS};
use crate::spatial::{leg_distance_km, round_km};

/// The ordered waypoint list of one route.
///
/// Invariants after every mutation:
/// - `order_position` values are exactly `{1, ..., N}`, no gaps or duplicates.
/// - `distance_from_previous` at position k > 1 equals the Haversine distance
///   to the waypoint at position k - 1, rounded to two decimals; `None` at
///   position 1.
#[derive(Debug, Clone, Default)]
pub struct RouteGeometry {
    waypoints: Vec<Waypoint>,
}

impl RouteGeometry {
    /// Rebuild the ordered list from stored rows.
    pub fn from_waypoints(mut waypoints: Vec<Waypoint>) -> Self {
        waypoints.sort_by_key(|wp| wp.order_position);
        Self { waypoints }
    }

    /// Build the geometry for a freshly created route. Requires at least a
    /// start and an end point; positions follow the input order.
    pub fn build(route_id: &str, entries: Vec<NewWaypoint>) -> Result<Self, RouteError> {
        if entries.len() < MIN_ROUTE_WAYPOINTS {
            return Err(RouteError::Validation(format!(
                "a route needs at least {} waypoints, got {}",
                MIN_ROUTE_WAYPOINTS,
                entries.len()
            )));
        }
        let mut geometry = Self::default();
        for entry in entries {
            geometry.add(route_id, entry, None)?;
        }
        Ok(geometry)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Sum of all leg distances, at stored precision.
    pub fn total_distance(&self) -> f64 {
        round_km(
            self.waypoints
                .iter()
                .filter_map(|wp| wp.distance_from_previous)
                .sum(),
        )
    }

    /// Insert a waypoint, appending when no position is requested. A requested
    /// position shifts every waypoint at or after it one slot to the right;
    /// positions past the end clamp to the append slot.
    pub fn add(
        &mut self,
        route_id: &str,
        entry: NewWaypoint,
        desired_position: Option<u32>,
    ) -> Result<Waypoint, RouteError> {
        entry.validate()?;
        let index = match desired_position {
            None => self.waypoints.len(),
            Some(0) => {
                return Err(RouteError::validation("position must be at least 1"));
            }
            Some(position) => ((position - 1) as usize).min(self.waypoints.len()),
        };

        self.waypoints.insert(
            index,
            Waypoint {
                id: Uuid::new_v4().to_string(),
                route_id: route_id.to_string(),
                name: entry.name,
                latitude: entry.latitude,
                longitude: entry.longitude,
                order_position: 0, // assigned by renumber below
                waypoint_type: entry.waypoint_type,
                distance_from_previous: None,
                description: entry.description,
                stop_duration_min: entry.stop_duration_min,
                elevation_m: entry.elevation_m,
                notes: entry.notes,
                poi_id: entry.poi_id,
            },
        );
        self.renumber();
        // The new leg, plus the successor whose predecessor changed.
        self.recompute_leg(index);
        self.recompute_leg(index + 1);
        Ok(self.waypoints[index].clone())
    }

    /// Apply a partial update. Coordinate changes recompute this waypoint's
    /// leg and its successor's.
    pub fn update(
        &mut self,
        waypoint_id: &str,
        update: WaypointUpdate,
    ) -> Result<Waypoint, RouteError> {
        let index = self.index_of(waypoint_id)?;

        let latitude = update.latitude.unwrap_or(self.waypoints[index].latitude);
        let longitude = update.longitude.unwrap_or(self.waypoints[index].longitude);
        crate::models::validate_coordinates(latitude, longitude)?;
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(RouteError::validation("waypoint name must not be empty"));
            }
        }

        let moved = update.latitude.is_some() || update.longitude.is_some();
        let wp = &mut self.waypoints[index];
        wp.latitude = latitude;
        wp.longitude = longitude;
        if let Some(name) = update.name {
            wp.name = name;
        }
        if let Some(ty) = update.waypoint_type {
            wp.waypoint_type = ty;
        }
        if let Some(description) = update.description {
            wp.description = Some(description);
        }
        if let Some(duration) = update.stop_duration_min {
            wp.stop_duration_min = Some(duration);
        }
        if let Some(elevation) = update.elevation_m {
            wp.elevation_m = Some(elevation);
        }
        if let Some(notes) = update.notes {
            wp.notes = Some(notes);
        }
        if let Some(poi_id) = update.poi_id {
            wp.poi_id = Some(poi_id);
        }

        if moved {
            self.recompute_leg(index);
            self.recompute_leg(index + 1);
        }
        Ok(self.waypoints[index].clone())
    }

    /// Move a waypoint to `new_position`, shifting the contiguous range
    /// between its old and new slots. Positions past the end clamp to the
    /// last slot; moving to the current position is a no-op.
    ///
    /// An arbitrary number of adjacency pairs change, so every leg is
    /// recomputed in position order afterwards.
    pub fn reorder(
        &mut self,
        waypoint_id: &str,
        new_position: u32,
    ) -> Result<&[Waypoint], RouteError> {
        if new_position < 1 {
            return Err(RouteError::validation("position must be at least 1"));
        }
        let index = self.index_of(waypoint_id)?;
        let target = ((new_position - 1) as usize).min(self.waypoints.len() - 1);
        if target == index {
            return Ok(&self.waypoints);
        }

        let moved = self.waypoints.remove(index);
        self.waypoints.insert(target, moved);
        self.renumber();
        self.recompute_all();
        Ok(&self.waypoints)
    }

    /// Remove a waypoint, closing the position gap. Predecessor relationships
    /// change from the removed slot onward.
    pub fn remove(&mut self, waypoint_id: &str) -> Result<Waypoint, RouteError> {
        let index = self.index_of(waypoint_id)?;
        let removed = self.waypoints.remove(index);
        self.renumber();
        for k in index..self.waypoints.len() {
            self.recompute_leg(k);
        }
        Ok(removed)
    }

    fn index_of(&self, waypoint_id: &str) -> Result<usize, RouteError> {
        self.waypoints
            .iter()
            .position(|wp| wp.id == waypoint_id)
            .ok_or_else(|| RouteError::not_found(format!("waypoint {}", waypoint_id)))
    }

    fn renumber(&mut self) {
        for (k, wp) in self.waypoints.iter_mut().enumerate() {
            wp.order_position = k as u32 + 1;
        }
    }

    /// Recompute `distance_from_previous` for the waypoint at `index`.
    /// Out-of-range indices are ignored so callers can blindly refresh a
    /// successor that may not exist.
    fn recompute_leg(&mut self, index: usize) {
        if index >= self.waypoints.len() {
            return;
        }
        let distance = if index == 0 {
            None
        } else {
            let prev = &self.waypoints[index - 1];
            let curr = &self.waypoints[index];
            Some(leg_distance_km(
                prev.latitude,
                prev.longitude,
                curr.latitude,
                curr.longitude,
            ))
        };
        self.waypoints[index].distance_from_previous = distance;
    }

    fn recompute_all(&mut self) {
        for k in 0..self.waypoints.len() {
            self.recompute_leg(k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WaypointType;

    fn point(name: &str, lat: f64, lon: f64) -> NewWaypoint {
        NewWaypoint {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            waypoint_type: WaypointType::Waypoint,
            description: None,
            stop_duration_min: None,
            elevation_m: None,
            notes: None,
            poi_id: None,
        }
    }

    fn triangle() -> RouteGeometry {
        RouteGeometry::build(
            "route-1",
            vec![
                point("a", 0.0, 0.0),
                point("b", 0.0, 1.0),
                point("c", 1.0, 1.0),
            ],
        )
        .unwrap()
    }

    fn assert_invariants(geometry: &RouteGeometry) {
        let wps = geometry.waypoints();
        for (k, wp) in wps.iter().enumerate() {
            assert_eq!(wp.order_position, k as u32 + 1, "positions must be dense");
            let expected = if k == 0 {
                None
            } else {
                Some(leg_distance_km(
                    wps[k - 1].latitude,
                    wps[k - 1].longitude,
                    wp.latitude,
                    wp.longitude,
                ))
            };
            assert_eq!(wp.distance_from_previous, expected, "leg {} stale", k + 1);
        }
        let total: f64 = wps.iter().filter_map(|wp| wp.distance_from_previous).sum();
        assert!((geometry.total_distance() - round_km(total)).abs() < 1e-9);
    }

    #[test]
    fn builds_route_in_input_order() {
        // One degree of longitude at the equator and one degree of latitude
        // are both ~111.19 km on a 6371 km sphere.
        let geometry = triangle();
        let wps = geometry.waypoints();
        assert_eq!(
            wps.iter().map(|w| w.order_position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(wps[0].distance_from_previous, None);
        assert_eq!(wps[1].distance_from_previous, Some(111.19));
        assert_eq!(wps[2].distance_from_previous, Some(111.19));
        assert_eq!(geometry.total_distance(), 222.38);
        assert_invariants(&geometry);
    }

    #[test]
    fn rejects_single_waypoint_route() {
        let err = RouteGeometry::build("route-1", vec![point("only", 0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let err = RouteGeometry::build(
            "route-1",
            vec![point("a", 0.0, 0.0), point("b", 91.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
    }

    #[test]
    fn append_extends_the_tail() {
        let mut geometry = triangle();
        let created = geometry.add("route-1", point("d", 1.0, 2.0), None).unwrap();
        assert_eq!(created.order_position, 4);
        assert!(created.distance_from_previous.is_some());
        assert_invariants(&geometry);
    }

    #[test]
    fn insert_shifts_later_waypoints_right() {
        let mut geometry = triangle();
        let created = geometry
            .add("route-1", point("mid", 0.0, 0.5), Some(2))
            .unwrap();
        assert_eq!(created.order_position, 2);
        let names: Vec<&str> = geometry.waypoints().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["a", "mid", "b", "c"]);
        // Both the new leg and the shifted successor's leg are fresh.
        assert_eq!(geometry.waypoints()[1].distance_from_previous, Some(55.6));
        assert_eq!(geometry.waypoints()[2].distance_from_previous, Some(55.6));
        assert_invariants(&geometry);
    }

    #[test]
    fn insert_past_end_clamps_to_append() {
        let mut geometry = triangle();
        let created = geometry
            .add("route-1", point("far", 2.0, 2.0), Some(99))
            .unwrap();
        assert_eq!(created.order_position, 4);
        assert_invariants(&geometry);
    }

    #[test]
    fn insert_at_position_zero_is_rejected() {
        let mut geometry = triangle();
        let err = geometry
            .add("route-1", point("x", 0.0, 0.0), Some(0))
            .unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
    }

    #[test]
    fn coordinate_update_refreshes_adjacent_legs() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[1].id.clone();
        geometry
            .update(
                &id,
                WaypointUpdate {
                    latitude: Some(0.0),
                    longitude: Some(2.0),
                    ..WaypointUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(geometry.waypoints()[1].distance_from_previous, Some(222.39));
        assert_invariants(&geometry);
    }

    #[test]
    fn metadata_update_leaves_distances_alone() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[2].id.clone();
        let before: Vec<Option<f64>> = geometry
            .waypoints()
            .iter()
            .map(|w| w.distance_from_previous)
            .collect();
        let updated = geometry
            .update(
                &id,
                WaypointUpdate {
                    name: Some("summit".to_string()),
                    waypoint_type: Some(WaypointType::Viewpoint),
                    notes: Some("gravel after the hairpin".to_string()),
                    ..WaypointUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "summit");
        assert_eq!(updated.waypoint_type, WaypointType::Viewpoint);
        let after: Vec<Option<f64>> = geometry
            .waypoints()
            .iter()
            .map(|w| w.distance_from_previous)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn update_unknown_waypoint_is_not_found() {
        let mut geometry = triangle();
        let err = geometry
            .update("missing", WaypointUpdate::default())
            .unwrap_err();
        assert!(matches!(err, RouteError::NotFound(_)));
    }

    #[test]
    fn reorder_moves_tail_to_front() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[2].id.clone();
        geometry.reorder(&id, 1).unwrap();
        let names: Vec<&str> = geometry.waypoints().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(geometry.waypoints()[0].distance_from_previous, None);
        assert_invariants(&geometry);
    }

    #[test]
    fn reorder_moves_front_to_tail() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[0].id.clone();
        geometry.reorder(&id, 3).unwrap();
        let names: Vec<&str> = geometry.waypoints().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_invariants(&geometry);
    }

    #[test]
    fn reorder_to_current_position_is_a_noop() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[1].id.clone();
        let before = serde_json::to_string(geometry.waypoints()).unwrap();
        geometry.reorder(&id, 2).unwrap();
        let after = serde_json::to_string(geometry.waypoints()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn reorder_past_end_clamps_to_last_slot() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[0].id.clone();
        geometry.reorder(&id, 50).unwrap();
        assert_eq!(
            geometry.waypoints().last().map(|w| w.name.as_str()),
            Some("a")
        );
        assert_invariants(&geometry);
    }

    #[test]
    fn reorder_to_position_zero_is_rejected() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[0].id.clone();
        assert!(matches!(
            geometry.reorder(&id, 0),
            Err(RouteError::Validation(_))
        ));
    }

    #[test]
    fn delete_middle_rebridges_neighbours() {
        let mut geometry = triangle();
        let id = geometry.waypoints()[1].id.clone();
        let total_before = geometry.total_distance();
        geometry.remove(&id).unwrap();
        let wps = geometry.waypoints();
        assert_eq!(wps.len(), 2);
        assert_eq!(
            wps.iter().map(|w| w.order_position).collect::<Vec<_>>(),
            vec![1, 2]
        );
        // The survivor at position 2 is measured straight to position 1,
        // skipping the deleted middle point: the (0,0)-(1,1) diagonal.
        assert_eq!(wps[1].distance_from_previous, Some(157.25));
        assert!(geometry.total_distance() < total_before);
        assert_invariants(&geometry);
    }

    #[test]
    fn delete_unknown_waypoint_is_not_found() {
        let mut geometry = triangle();
        assert!(matches!(
            geometry.remove("missing"),
            Err(RouteError::NotFound(_))
        ));
    }

    #[test]
    fn invariants_hold_across_mixed_mutation_sequence() {
        let mut geometry = triangle();
        geometry.add("route-1", point("d", 2.0, 1.0), Some(1)).unwrap();
        let id = geometry.waypoints()[3].id.clone();
        geometry.reorder(&id, 2).unwrap();
        let id = geometry.waypoints()[0].id.clone();
        geometry.remove(&id).unwrap();
        geometry.add("route-1", point("e", -1.0, 0.0), None).unwrap();
        let id = geometry.waypoints()[1].id.clone();
        geometry
            .update(
                &id,
                WaypointUpdate {
                    latitude: Some(0.5),
                    ..WaypointUpdate::default()
                },
            )
            .unwrap();
        assert_invariants(&geometry);
    }
}
