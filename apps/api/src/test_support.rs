//! Router harness for handler tests: a bootstrapped SQLite file per test.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{Backend, Config, DbProfile, Environment};
use crate::db::{create_pool, ensure_schema};
use crate::locations::search::CatalogPlaceSearch;
use crate::routes::build_router;
use crate::state::AppState;

/// Keep the returned `TempDir` alive for the whole test.
pub async fn test_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let profile = DbProfile {
        url: format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("test.sqlite3").display()
        ),
        backend: Backend::Sqlite,
        min_connections: 1,
        max_connections: 1,
        bootstrap_schema: true,
    };
    let db = create_pool(&profile).await.expect("connect sqlite");
    ensure_schema(&db, Backend::Sqlite).await.expect("bootstrap schema");

    let state = AppState {
        places: Arc::new(CatalogPlaceSearch::new(db.clone())),
        db,
        config: Config {
            environment: Environment::Testing,
            database: profile,
            port: 0,
            rust_log: "debug".to_string(),
        },
    };
    (state, dir)
}

/// Sends one request through a fresh router and returns status plus the body
/// as JSON (plain-text bodies come back as a JSON string, empty as null).
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = build_router(state.clone())
        .oneshot(builder.body(body).expect("build request"))
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn seed_user(state: &AppState, first_name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (first_name) VALUES ($1) RETURNING id")
        .bind(first_name)
        .fetch_one(&state.db)
        .await
        .expect("seed user")
}

pub async fn seed_skill(state: &AppState, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO skills (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(&state.db)
        .await
        .expect("seed skill")
}

pub async fn seed_location(state: &AppState, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO locations (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(&state.db)
        .await
        .expect("seed location")
}
