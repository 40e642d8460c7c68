use axum::{extract::State, Json};
use profile_board_common::{
    validation::{self, TITLE_MAX_LEN},
    ApiData, AutocompleteQuery, DeleteUserLocation, LocationRef, NewUserLocations,
};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::locations::queries::{attach_locations, detach_location, user_locations};
use crate::state::AppState;
use crate::users::handlers::require_user;

/// POST /locations/new
pub async fn handle_new_locations(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewUserLocations>,
) -> Result<Json<ApiData<Vec<LocationRef>>>, AppError> {
    if req.locations.is_empty() {
        return Err(AppError::BadRequest("No locations given".to_string()));
    }
    let names = req
        .locations
        .into_iter()
        .map(|loc| {
            let name = loc.name.trim().to_string();
            validation::validate_text(&name, TITLE_MAX_LEN)
                .map(|_| name)
                .map_err(|e| AppError::invalid("location", e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    require_user(&state, req.user_id).await?;
    attach_locations(&state.db, req.user_id, &names).await?;
    info!("Attached {} location(s) to user {}", names.len(), req.user_id);

    Ok(Json(ApiData {
        data: user_locations(&state.db, req.user_id).await?,
    }))
}

/// POST /locations/delete-user-location
pub async fn handle_delete_user_location(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeleteUserLocation>,
) -> Result<Json<ApiData<Vec<LocationRef>>>, AppError> {
    let removed = detach_location(&state.db, req.user_id, req.location_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "Location {} is not attached to user {}",
            req.location_id, req.user_id
        )));
    }
    info!("Detached location {} from user {}", req.location_id, req.user_id);

    Ok(Json(ApiData {
        data: user_locations(&state.db, req.user_id).await?,
    }))
}

/// POST /api/autocomplete
pub async fn handle_location_autocomplete(
    State(state): State<AppState>,
    AppJson(req): AppJson<AutocompleteQuery>,
) -> Result<Json<ApiData<Vec<LocationRef>>>, AppError> {
    if req.value.trim().is_empty() {
        return Err(AppError::BadRequest("Search value is empty".to_string()));
    }
    let places = state.places.search(&req.value).await?;
    if places.is_empty() {
        return Err(AppError::ZeroResults("locations"));
    }
    Ok(Json(ApiData { data: places }))
}

#[cfg(test)]
mod tests {
    use crate::db::seed_catalog;
    use crate::test_support::{send, seed_location, seed_user, test_state};
    use axum::http::{Method, StatusCode};
    use profile_board_common::ZERO_RESULTS;
    use serde_json::json;

    #[tokio::test]
    async fn test_new_locations_upserts_by_name() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;
        let remote = seed_location(&state, "Remote").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/locations/new",
            Some(json!({
                "locations": [{"id": remote, "name": "Remote"}, {"name": "Berlin"}],
                "user_id": user
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Berlin", "Remote"]);
        assert_eq!(body["data"][1]["id"], remote);
    }

    #[tokio::test]
    async fn test_seeded_catalog_is_searchable() {
        let (state, _dir) = test_state().await;
        seed_catalog(&state.db).await.unwrap();
        seed_catalog(&state.db).await.unwrap();

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/autocomplete",
            Some(json!({"value": "rem"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "Remote");
    }

    #[tokio::test]
    async fn test_new_locations_unknown_user_is_404() {
        let (state, _dir) = test_state().await;
        let (status, _) = send(
            &state,
            Method::POST,
            "/locations/new",
            Some(json!({"locations": [{"name": "Remote"}], "user_id": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_location() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, "Ada").await;
        send(
            &state,
            Method::POST,
            "/locations/new",
            Some(json!({"locations": [{"name": "Remote"}], "user_id": user})),
        )
        .await;
        let (_, profile) = send(&state, Method::GET, &format!("/users/get-extras/{user}"), None).await;
        let location_id = profile["data"]["locations"][0]["id"].as_i64().unwrap();

        let body = json!({"location_id": location_id, "user_id": user});
        let (status, after) = send(
            &state,
            Method::POST,
            "/locations/delete-user-location",
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after["data"], json!([]));

        let (status, _) = send(&state, Method::POST, "/locations/delete-user-location", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_location_autocomplete() {
        let (state, _dir) = test_state().await;
        seed_location(&state, "Remote").await;
        seed_location(&state, "Reno, NV").await;
        seed_location(&state, "Berlin").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/autocomplete",
            Some(json!({"value": "re"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/autocomplete",
            Some(json!({"value": "Tokyo"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["err"], ZERO_RESULTS);
    }
}
