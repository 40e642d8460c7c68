use profile_board_common::{SkillKind, SkillRef};
use sqlx::AnyPool;

use crate::db::prefix_pattern;
use crate::models::catalog::CatalogRow;
use crate::models::review::SkillForReviewRow;

// `SkillKind::table()` only yields the two join table names, so formatting it
// into SQL is safe.

pub async fn user_skills(
    pool: &AnyPool,
    user_id: i64,
    kind: SkillKind,
) -> sqlx::Result<Vec<SkillRef>> {
    let sql = format!(
        r#"
        SELECT s.id, s.name
        FROM skills s
        JOIN {table} us ON us.skill_id = s.id
        WHERE us.user_id = $1
        ORDER BY s.name
        "#,
        table = kind.table()
    );
    let rows = sqlx::query_as::<_, CatalogRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(SkillRef::from).collect())
}

/// Ids from `ids` that have no row in the skills catalog.
pub async fn missing_skill_ids(pool: &AnyPool, ids: &[i64]) -> sqlx::Result<Vec<i64>> {
    let mut missing = Vec::new();
    for &id in ids {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if found.is_none() {
            missing.push(id);
        }
    }
    Ok(missing)
}

pub async fn attach_skills(
    pool: &AnyPool,
    user_id: i64,
    kind: SkillKind,
    skill_ids: &[i64],
) -> sqlx::Result<()> {
    let sql = format!(
        "INSERT INTO {} (user_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        kind.table()
    );
    let mut tx = pool.begin().await?;
    for &skill_id in skill_ids {
        sqlx::query(&sql)
            .bind(user_id)
            .bind(skill_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

pub async fn detach_skill(
    pool: &AnyPool,
    user_id: i64,
    kind: SkillKind,
    skill_id: i64,
) -> sqlx::Result<u64> {
    let sql = format!(
        "DELETE FROM {} WHERE user_id = $1 AND skill_id = $2",
        kind.table()
    );
    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(skill_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn search_skills(pool: &AnyPool, value: &str, limit: i64) -> sqlx::Result<Vec<SkillRef>> {
    let rows = sqlx::query_as::<_, CatalogRow>(
        "SELECT id, name FROM skills WHERE LOWER(name) LIKE $1 ESCAPE '\\' ORDER BY name LIMIT $2",
    )
    .bind(prefix_pattern(value))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(SkillRef::from).collect())
}

pub async fn insert_skill_for_review(
    pool: &AnyPool,
    name: &str,
    user_id: i64,
    kind: SkillKind,
) -> sqlx::Result<SkillForReviewRow> {
    sqlx::query_as::<_, SkillForReviewRow>(
        r#"
        INSERT INTO skills_for_review (skill_for_review, user_id, skill_type)
        VALUES ($1, $2, $3)
        RETURNING id, skill_for_review, user_id, skill_type
        "#,
    )
    .bind(name)
    .bind(user_id)
    .bind(kind.table())
    .fetch_one(pool)
    .await
}
