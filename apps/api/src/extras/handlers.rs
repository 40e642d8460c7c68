use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Datelike;
use profile_board_common::{
    validation::{self, ValidationError, COMPANY_MAX_LEN, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN},
    ApiData, DateRange, ExperienceChanges, ExperienceRecord, NewExperience,
};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::extras::queries::{
    delete_experience, find_experience, insert_experience, update_experience,
};
use crate::state::AppState;
use crate::users::handlers::require_user;

/// POST /extras/new/experience
pub async fn handle_new_experience(
    State(state): State<AppState>,
    AppJson(mut req): AppJson<NewExperience>,
) -> Result<(StatusCode, Json<ApiData<ExperienceRecord>>), AppError> {
    let current_year = chrono::Utc::now().year();
    validate_text_field("company_name", &req.company_name, COMPANY_MAX_LEN)?;
    validate_text_field("job_title", &req.job_title, TITLE_MAX_LEN)?;
    validate_text_field("job_description", &req.job_description, DESCRIPTION_MAX_LEN)?;
    req.job_dates = normalize_job_dates(&req.job_dates, current_year)?;

    require_user(&state, req.user_id).await?;
    let row = insert_experience(&state.db, &req).await?;
    info!("Created experience {} for user {}", row.id, row.user_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiData {
            data: ExperienceRecord::from(row),
        }),
    ))
}

/// PUT /extras/experience/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(mut changes): AppJson<ExperienceChanges>,
) -> Result<Json<ApiData<ExperienceRecord>>, AppError> {
    if changes.is_empty() {
        return Err(AppError::BadRequest("No experience fields to update".to_string()));
    }
    let current_year = chrono::Utc::now().year();
    if let Some(company) = &changes.company_name {
        validate_text_field("company_name", company, COMPANY_MAX_LEN)?;
    }
    if let Some(title) = &changes.job_title {
        validate_text_field("job_title", title, TITLE_MAX_LEN)?;
    }
    if let Some(description) = &changes.job_description {
        validate_text_field("job_description", description, DESCRIPTION_MAX_LEN)?;
    }
    if let Some(dates) = changes.job_dates.take() {
        changes.job_dates = Some(normalize_job_dates(&dates, current_year)?);
    }

    if update_experience(&state.db, id, &changes).await? == 0 {
        return Err(AppError::NotFound(format!("Experience {id} not found")));
    }
    let row = find_experience(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Experience {id} not found")))?;
    info!("Updated experience {id}");

    Ok(Json(ApiData {
        data: ExperienceRecord::from(row),
    }))
}

/// DELETE /extras/experience/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if delete_experience(&state.db, id).await? == 0 {
        return Err(AppError::NotFound(format!("Experience {id} not found")));
    }
    info!("Deleted experience {id}");
    Ok(StatusCode::NO_CONTENT)
}

fn validate_text_field(field: &'static str, value: &str, max_len: usize) -> Result<(), AppError> {
    validation::validate_text(value, max_len).map_err(|e| AppError::invalid(field, e))
}

/// Decodes, validates and re-encodes a `job_dates` string.
fn normalize_job_dates(dates: &str, current_year: i32) -> Result<String, AppError> {
    let range = dates.parse::<DateRange>().map_err(|e| {
        AppError::invalid("job_dates", ValidationError::MalformedDates(e.to_string()))
    })?;
    range
        .validate(current_year)
        .map_err(|e| AppError::invalid("job_dates", e))?;
    Ok(range.to_string())
}
