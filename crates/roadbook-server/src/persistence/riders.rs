//! Rider session token persistence.

use anyhow::Result;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
pub struct RiderRow {
    pub rider_id: String,
    pub session_token: String,
}

/// Upsert a rider's session token.
pub async fn upsert_rider_token(pool: &SqlitePool, rider_id: &str, token: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO riders (rider_id, session_token, created_at)
        VALUES (?1, ?2, CURRENT_TIMESTAMP)
        ON CONFLICT(rider_id) DO UPDATE SET
            session_token = ?2
        "#,
    )
    .bind(rider_id)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

/// Resolve a session token to the rider that owns it.
pub async fn find_rider_by_token(pool: &SqlitePool, token: &str) -> Result<Option<String>> {
    let row = sqlx::query_as::<_, RiderRow>(
        "SELECT rider_id, session_token FROM riders WHERE session_token = ?1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.rider_id))
}
