use profile_board_common::{Profile, ProfileChanges, SkillKind};
use sqlx::AnyPool;

use crate::extras::queries::user_experience;
use crate::locations::queries::user_locations;
use crate::models::user::UserRow;
use crate::skills::queries::user_skills;

/// Nullable text columns come back as `''` when unset; `UserRow` maps that
/// to `None`.
const USER_COLUMNS: &str = "id, \
    COALESCE(first_name, '') AS first_name, \
    COALESCE(last_name, '') AS last_name, \
    COALESCE(summary, '') AS summary, \
    COALESCE(desired_title, '') AS desired_title, \
    COALESCE(area_of_work, '') AS area_of_work, \
    COALESCE(image, '') AS image";

pub async fn count_users(pool: &AnyPool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

/// One page of the profile feed, oldest profiles first.
pub async fn list_users(pool: &AnyPool, limit: i64, offset: i64) -> sqlx::Result<Vec<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn find_user(pool: &AnyPool, user_id: i64) -> sqlx::Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn user_exists(pool: &AnyPool, user_id: i64) -> sqlx::Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// The user row with locations, both skill sets and experience attached.
pub async fn load_profile(pool: &AnyPool, user_id: i64) -> sqlx::Result<Option<Profile>> {
    let Some(row) = find_user(pool, user_id).await? else {
        return Ok(None);
    };

    let mut profile = Profile::from(row);
    profile.locations = user_locations(pool, user_id).await?;
    profile.top_skills = user_skills(pool, user_id, SkillKind::Top).await?;
    profile.additional_skills = user_skills(pool, user_id, SkillKind::Additional).await?;
    profile.experience = user_experience(pool, user_id).await?;
    Ok(Some(profile))
}

/// Updates only the columns present in `changes`. Returns rows affected.
pub async fn update_user(
    pool: &AnyPool,
    user_id: i64,
    changes: &ProfileChanges,
) -> sqlx::Result<u64> {
    let columns = [
        ("first_name", &changes.first_name),
        ("last_name", &changes.last_name),
        ("summary", &changes.summary),
        ("desired_title", &changes.desired_title),
        ("area_of_work", &changes.area_of_work),
    ];

    let mut assignments = Vec::new();
    let mut values: Vec<&str> = Vec::new();
    for (column, value) in columns {
        if let Some(value) = value {
            values.push(value);
            assignments.push(format!("{column} = ${}", values.len()));
        }
    }
    if assignments.is_empty() {
        return Ok(0);
    }

    let sql = format!(
        "UPDATE users SET {} WHERE id = ${}",
        assignments.join(", "),
        values.len() + 1
    );
    let mut query = sqlx::query(&sql);
    for value in values {
        query = query.bind(value);
    }
    let result = query.bind(user_id).execute(pool).await?;
    Ok(result.rows_affected())
}
