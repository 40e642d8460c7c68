use axum::{extract::State, Json};
use profile_board_common::{
    validation, ApiData, AutocompleteQuery, DeleteUserSkill, NewSkillForReview, NewUserSkills,
    SkillForReview, SkillRef,
};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::skills::queries::{
    attach_skills, detach_skill, insert_skill_for_review, missing_skill_ids, search_skills,
    user_skills,
};
use crate::state::AppState;
use crate::users::handlers::require_user;

const MAX_SUGGESTIONS: i64 = 10;

/// POST /skills/new-user-skill
pub async fn handle_new_user_skills(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewUserSkills>,
) -> Result<Json<ApiData<Vec<SkillRef>>>, AppError> {
    if req.skills.is_empty() {
        return Err(AppError::BadRequest("No skills given".to_string()));
    }
    require_user(&state, req.user_id).await?;

    let ids: Vec<i64> = req.skills.iter().map(|s| s.id).collect();
    let missing = missing_skill_ids(&state.db, &ids).await?;
    if let Some(id) = missing.first() {
        return Err(AppError::NotFound(format!("Skill {id} not found")));
    }

    attach_skills(&state.db, req.user_id, req.kind, &ids).await?;
    info!(
        "Attached {} skill(s) to {} of user {}",
        ids.len(),
        req.kind.table(),
        req.user_id
    );

    Ok(Json(ApiData {
        data: user_skills(&state.db, req.user_id, req.kind).await?,
    }))
}

/// POST /skills/delete-user-skill
pub async fn handle_delete_user_skill(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeleteUserSkill>,
) -> Result<Json<ApiData<Vec<SkillRef>>>, AppError> {
    let removed = detach_skill(&state.db, req.user_id, req.kind, req.skill_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "Skill {} is not in {} of user {}",
            req.skill_id,
            req.kind.table(),
            req.user_id
        )));
    }

    Ok(Json(ApiData {
        data: user_skills(&state.db, req.user_id, req.kind).await?,
    }))
}

/// POST /skills/autocomplete
pub async fn handle_skill_autocomplete(
    State(state): State<AppState>,
    AppJson(req): AppJson<AutocompleteQuery>,
) -> Result<Json<ApiData<Vec<SkillRef>>>, AppError> {
    if req.value.trim().is_empty() {
        return Err(AppError::BadRequest("Search value is empty".to_string()));
    }
    let skills = search_skills(&state.db, &req.value, MAX_SUGGESTIONS).await?;
    if skills.is_empty() {
        return Err(AppError::ZeroResults("skills"));
    }
    Ok(Json(ApiData { data: skills }))
}

/// POST /skills-for-review/new
pub async fn handle_new_skill_for_review(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewSkillForReview>,
) -> Result<Json<ApiData<SkillForReview>>, AppError> {
    let name = req.skill_for_review.trim();
    validation::validate_skill_name(name).map_err(|e| AppError::invalid("skill_for_review", e))?;
    require_user(&state, req.user_id).await?;

    let row = insert_skill_for_review(&state.db, name, req.user_id, req.kind).await?;
    info!("Queued skill '{}' for review (user {})", name, req.user_id);

    Ok(Json(ApiData {
        data: SkillForReview::try_from(row)?,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, seed_skill, seed_user, test_state};
    use axum::http::{Method, StatusCode};
    use profile_board_common::ZERO_RESULTS;
    use serde_json::json;

    #[tokio::test]
    async fn test_attach_and_detach_top_skill() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;
        let go = seed_skill(&state, "Go").await;
        let rust = seed_skill(&state, "Rust").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/skills/new-user-skill",
            Some(json!({
                "skills": [{"id": go, "name": "Go"}, {"id": rust, "name": "Rust"}],
                "user_id": user,
                "type": "user_top_skills"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, profile) = send(&state, Method::GET, &format!("/users/get-extras/{user}"), None).await;
        assert_eq!(profile["data"]["top_skills"].as_array().unwrap().len(), 2);
        assert_eq!(profile["data"]["additional_skills"], json!([]));

        let (status, body) = send(
            &state,
            Method::POST,
            "/skills/delete-user-skill",
            Some(json!({"skill_id": go, "user_id": user, "type": "user_top_skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([{"id": rust, "name": "Rust"}]));
    }

    #[tokio::test]
    async fn test_delete_from_wrong_set_is_404() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;
        let go = seed_skill(&state, "Go").await;
        send(
            &state,
            Method::POST,
            "/skills/new-user-skill",
            Some(json!({"skills": [{"id": go, "name": "Go"}], "user_id": user, "type": "user_top_skills"})),
        )
        .await;

        let (status, _) = send(
            &state,
            Method::POST,
            "/skills/delete-user-skill",
            Some(json!({"skill_id": go, "user_id": user, "type": "user_additional_skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_skill_id_is_rejected() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/skills/new-user-skill",
            Some(json!({"skills": [{"id": 999, "name": "Zig"}], "user_id": user, "type": "user_top_skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["err"], "Skill 999 not found");
    }

    #[tokio::test]
    async fn test_bad_skill_type_gets_failure_body() {
        let (state, _dir) = test_state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/skills/delete-user-skill",
            Some(json!({"skill_id": 1, "user_id": 1, "type": "user_secret_skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["mssg"], "Invalid request body");
        assert!(body["err"].as_str().unwrap().contains("unknown variant"));
    }

    #[tokio::test]
    async fn test_skill_autocomplete_prefix_and_zero_results() {
        let (state, _dir) = test_state().await;
        seed_skill(&state, "Rust").await;
        seed_skill(&state, "Ruby").await;
        seed_skill(&state, "Go").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/skills/autocomplete",
            Some(json!({"value": "RU"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s["name"].as_str().unwrap())
                .collect::<Vec<_>>(),
            vec!["Ruby", "Rust"]
        );

        let (status, body) = send(
            &state,
            Method::POST,
            "/skills/autocomplete",
            Some(json!({"value": "Zig"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["err"], ZERO_RESULTS);
    }

    #[tokio::test]
    async fn test_skill_for_review_is_queued() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/skills-for-review/new",
            Some(json!({"skill_for_review": " Zig ", "user_id": user, "type": "user_additional_skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["skill_for_review"], "Zig");
        assert_eq!(body["data"]["type"], "user_additional_skills");
        assert_eq!(body["data"]["user_id"], user);
    }

    #[tokio::test]
    async fn test_skill_for_review_validates_name() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/skills-for-review/new",
            Some(json!({"skill_for_review": "<blink>", "user_id": user, "type": "user_top_skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["mssg"], "Invalid skill_for_review");
    }
}
