//! Route and waypoint persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use roadbook_core::models::{Route, Waypoint, WaypointType};
use sqlx::SqlitePool;

/// Insert a route together with its full waypoint list in one transaction.
pub async fn insert_route_with_waypoints(
    pool: &SqlitePool,
    route: &Route,
    waypoints: &[Waypoint],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO routes (id, owner_id, name, description, total_distance, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&route.id)
    .bind(&route.owner_id)
    .bind(&route.name)
    .bind(&route.description)
    .bind(route.total_distance)
    .bind(route.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    for wp in waypoints {
        insert_waypoint_row(&mut tx, wp).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Replace a route's waypoint set and stored total in one transaction.
///
/// Every mutation rewrites the full ordered list, so positions and distances
/// land atomically and the dense ordering is never observable half-shifted.
pub async fn replace_route_geometry(
    pool: &SqlitePool,
    route_id: &str,
    total_distance: f64,
    waypoints: &[Waypoint],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE routes SET total_distance = ?1 WHERE id = ?2")
        .bind(total_distance)
        .bind(route_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM waypoints WHERE route_id = ?1")
        .bind(route_id)
        .execute(&mut *tx)
        .await?;

    for wp in waypoints {
        insert_waypoint_row(&mut tx, wp).await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn insert_waypoint_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    wp: &Waypoint,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO waypoints (
            id, route_id, name, latitude, longitude,
            order_position, waypoint_type, distance_from_previous,
            description, stop_duration_min, elevation_m, notes, poi_id
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&wp.id)
    .bind(&wp.route_id)
    .bind(&wp.name)
    .bind(wp.latitude)
    .bind(wp.longitude)
    .bind(wp.order_position)
    .bind(wp.waypoint_type.as_str())
    .bind(wp.distance_from_previous)
    .bind(&wp.description)
    .bind(wp.stop_duration_min)
    .bind(wp.elevation_m)
    .bind(&wp.notes)
    .bind(&wp.poi_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Load a single route by ID.
pub async fn load_route(pool: &SqlitePool, route_id: &str) -> Result<Option<Route>> {
    let row = sqlx::query_as::<_, RouteRow>(
        "SELECT id, owner_id, name, description, total_distance, created_at FROM routes WHERE id = ?1",
    )
    .bind(route_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => Ok(Some(r.try_into()?)),
        None => Ok(None),
    }
}

/// Load routes owned by a rider.
pub async fn load_routes_by_owner(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Route>> {
    let rows = sqlx::query_as::<_, RouteRow>(
        "SELECT id, owner_id, name, description, total_distance, created_at FROM routes WHERE owner_id = ?1 ORDER BY created_at",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

/// Load a route's waypoints in position order.
pub async fn load_waypoints(pool: &SqlitePool, route_id: &str) -> Result<Vec<Waypoint>> {
    let rows = sqlx::query_as::<_, WaypointRow>(
        r#"
        SELECT id, route_id, name, latitude, longitude,
               order_position, waypoint_type, distance_from_previous,
               description, stop_duration_min, elevation_m, notes, poi_id
        FROM waypoints WHERE route_id = ?1 ORDER BY order_position
        "#,
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

/// Delete a route and its waypoints. Returns false when the route is unknown.
pub async fn delete_route(pool: &SqlitePool, route_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM waypoints WHERE route_id = ?1")
        .bind(route_id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM routes WHERE id = ?1")
        .bind(route_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

// Internal row types for SQLx

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: String,
    owner_id: String,
    name: String,
    description: Option<String>,
    total_distance: f64,
    created_at: String,
}

impl TryFrom<RouteRow> for Route {
    type Error = anyhow::Error;

    fn try_from(row: RouteRow) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Route {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            total_distance: row.total_distance,
            created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct WaypointRow {
    id: String,
    route_id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    order_position: u32,
    waypoint_type: String,
    distance_from_previous: Option<f64>,
    description: Option<String>,
    stop_duration_min: Option<u32>,
    elevation_m: Option<f64>,
    notes: Option<String>,
    poi_id: Option<String>,
}

impl TryFrom<WaypointRow> for Waypoint {
    type Error = anyhow::Error;

    fn try_from(row: WaypointRow) -> Result<Self> {
        let waypoint_type = WaypointType::parse(&row.waypoint_type)
            .ok_or_else(|| anyhow::anyhow!("unknown waypoint type: {}", row.waypoint_type))?;

        Ok(Waypoint {
            id: row.id,
            route_id: row.route_id,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            order_position: row.order_position,
            waypoint_type,
            distance_from_previous: row.distance_from_previous,
            description: row.description,
            stop_duration_min: row.stop_duration_min,
            elevation_m: row.elevation_m,
            notes: row.notes,
            poi_id: row.poi_id,
        })
    }
}
