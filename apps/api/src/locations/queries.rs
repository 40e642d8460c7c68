use profile_board_common::LocationRef;
use sqlx::AnyPool;
use tracing::debug;

use crate::db::prefix_pattern;
use crate::models::catalog::CatalogRow;

pub async fn user_locations(pool: &AnyPool, user_id: i64) -> sqlx::Result<Vec<LocationRef>> {
    let rows = sqlx::query_as::<_, CatalogRow>(
        r#"
        SELECT l.id, l.name
        FROM locations l
        JOIN user_locations ul ON ul.location_id = l.id
        WHERE ul.user_id = $1
        ORDER BY l.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(LocationRef::from).collect())
}

/// Adds each named location to the catalog if missing and attaches it to the
/// user. Names already attached are left as they are.
pub async fn attach_locations(pool: &AnyPool, user_id: i64, names: &[String]) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    for name in names {
        sqlx::query("INSERT INTO locations (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name.as_str())
            .execute(&mut *tx)
            .await?;

        let location_id: i64 = sqlx::query_scalar("SELECT id FROM locations WHERE name = $1")
            .bind(name.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_locations (user_id, location_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(location_id)
        .execute(&mut *tx)
        .await?;

        debug!("Attached location {location_id} ({name}) to user {user_id}");
    }

    tx.commit().await
}

pub async fn detach_location(pool: &AnyPool, user_id: i64, location_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM user_locations WHERE user_id = $1 AND location_id = $2")
        .bind(user_id)
        .bind(location_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn search_locations(
    pool: &AnyPool,
    value: &str,
    limit: i64,
) -> sqlx::Result<Vec<LocationRef>> {
    let rows = sqlx::query_as::<_, CatalogRow>(
        "SELECT id, name FROM locations WHERE LOWER(name) LIKE $1 ESCAPE '\\' ORDER BY name LIMIT $2",
    )
    .bind(prefix_pattern(value))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(LocationRef::from).collect())
}
