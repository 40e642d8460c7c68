use profile_board_common::{ExperienceChanges, ExperienceRecord, NewExperience};
use sqlx::AnyPool;

use crate::models::experience::ExperienceRow;

const EXPERIENCE_COLUMNS: &str =
    "id, user_id, company_name, job_title, job_description, job_dates";

pub async fn user_experience(pool: &AnyPool, user_id: i64) -> sqlx::Result<Vec<ExperienceRecord>> {
    let sql = format!("SELECT {EXPERIENCE_COLUMNS} FROM experience WHERE user_id = $1 ORDER BY id");
    let rows = sqlx::query_as::<_, ExperienceRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(ExperienceRecord::from).collect())
}

pub async fn find_experience(pool: &AnyPool, id: i64) -> sqlx::Result<Option<ExperienceRow>> {
    let sql = format!("SELECT {EXPERIENCE_COLUMNS} FROM experience WHERE id = $1");
    sqlx::query_as::<_, ExperienceRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_experience(pool: &AnyPool, new: &NewExperience) -> sqlx::Result<ExperienceRow> {
    let sql = format!(
        r#"
        INSERT INTO experience (user_id, company_name, job_title, job_description, job_dates)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {EXPERIENCE_COLUMNS}
        "#
    );
    sqlx::query_as::<_, ExperienceRow>(&sql)
        .bind(new.user_id)
        .bind(new.company_name.as_str())
        .bind(new.job_title.as_str())
        .bind(new.job_description.as_str())
        .bind(new.job_dates.as_str())
        .fetch_one(pool)
        .await
}

/// Updates only the columns present in `changes`. Returns rows affected.
pub async fn update_experience(
    pool: &AnyPool,
    id: i64,
    changes: &ExperienceChanges,
) -> sqlx::Result<u64> {
    let columns = [
        ("company_name", &changes.company_name),
        ("job_title", &changes.job_title),
        ("job_description", &changes.job_description),
        ("job_dates", &changes.job_dates),
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
        "UPDATE experience SET {} WHERE id = ${}",
        assignments.join(", "),
        values.len() + 1
    );
    let mut query = sqlx::query(&sql);
    for value in values {
        query = query.bind(value);
    }
    let result = query.bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn delete_experience(pool: &AnyPool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM experience WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
