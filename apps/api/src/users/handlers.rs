use axum::{
    extract::{Path, Query, State},
    Json,
};
use profile_board_common::{
    validation::{self, TITLE_MAX_LEN},
    ApiData, FeedPage, Profile, ProfileCard, ProfileChanges,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::users::queries::{count_users, list_users, load_profile, update_user, user_exists};

pub const DEFAULT_PAGE_SIZE: i64 = 14;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FeedQuery {
    fn bounds(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// GET /users
pub async fn handle_list_users(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<ApiData<FeedPage>>, AppError> {
    let (limit, offset) = params.bounds();
    let total = count_users(&state.db).await?;
    let users = list_users(&state.db, limit, offset)
        .await?
        .into_iter()
        .map(ProfileCard::from)
        .collect();

    Ok(Json(ApiData {
        data: FeedPage { users, total },
    }))
}

/// GET /users/get-extras/:id
pub async fn handle_get_extras(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiData<Profile>>, AppError> {
    let profile = load_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    Ok(Json(ApiData { data: profile }))
}

/// PUT /users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(changes): AppJson<ProfileChanges>,
) -> Result<Json<ApiData<Profile>>, AppError> {
    validate_profile_changes(&changes)?;

    let updated = update_user(&state.db, user_id, &changes).await?;
    if updated == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }
    info!("Updated profile fields for user {user_id}");

    let profile = load_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    Ok(Json(ApiData { data: profile }))
}

/// Re-checks client-side rules; the dashboard's checks can be bypassed.
pub fn validate_profile_changes(changes: &ProfileChanges) -> Result<(), AppError> {
    if changes.is_empty() {
        return Err(AppError::BadRequest("No profile fields to update".to_string()));
    }
    if let Some(name) = &changes.first_name {
        validation::validate_name(name).map_err(|e| AppError::invalid("first_name", e))?;
    }
    if let Some(name) = &changes.last_name {
        validation::validate_name(name).map_err(|e| AppError::invalid("last_name", e))?;
    }
    if let Some(summary) = &changes.summary {
        validation::validate_summary(summary).map_err(|e| AppError::invalid("summary", e))?;
    }
    if let Some(title) = &changes.desired_title {
        validation::validate_text(title, TITLE_MAX_LEN)
            .map_err(|e| AppError::invalid("desired_title", e))?;
    }
    if let Some(area) = &changes.area_of_work {
        validation::validate_text(area, TITLE_MAX_LEN)
            .map_err(|e| AppError::invalid("area_of_work", e))?;
    }
    Ok(())
}

/// Fails with 404 unless the user exists. Join-table writes call this first
/// so a bad `user_id` is reported the same way on every backend.
pub async fn require_user(state: &AppState, user_id: i64) -> Result<(), AppError> {
    if user_exists(&state.db, user_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("User {user_id} not found")))
    }
}
