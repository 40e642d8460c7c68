pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::extras::handlers as extras;
use crate::locations::handlers as locations;
use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Profiles
        .route("/users", get(users::handle_list_users))
        .route("/users/get-extras/:id", get(users::handle_get_extras))
        .route("/users/:id", put(users::handle_update_user))
        // Locations
        .route("/locations/new", post(locations::handle_new_locations))
        .route(
            "/locations/delete-user-location",
            post(locations::handle_delete_user_location),
        )
        .route(
            "/api/autocomplete",
            post(locations::handle_location_autocomplete),
        )
        // Skills
        .route("/skills/new-user-skill", post(skills::handle_new_user_skills))
        .route(
            "/skills/delete-user-skill",
            post(skills::handle_delete_user_skill),
        )
        .route("/skills/autocomplete", post(skills::handle_skill_autocomplete))
        .route(
            "/skills-for-review/new",
            post(skills::handle_new_skill_for_review),
        )
        // Experience
        .route(
            "/extras/new/experience",
            post(extras::handle_new_experience),
        )
        .route(
            "/extras/experience/:id",
            put(extras::handle_update_experience).delete(extras::handle_delete_experience),
        )
        .with_state(state)
}
