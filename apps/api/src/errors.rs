use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use profile_board_common::{ApiFailure, ValidationError, ZERO_RESULTS};
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// every failure body has the `{"mssg", "err"}` shape.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error on {field}: {source}")]
    Validation {
        field: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body missing, not JSON, or not the expected shape.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// A lookup that matched nothing. Clients key off the `err` text.
    #[error("No {0} matched")]
    ZeroResults(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, source: ValidationError) -> Self {
        AppError::Validation { field, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mssg, err) = match &self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "Resource not found".to_string(),
                what.clone(),
            ),
            AppError::Validation { field, source } => (
                StatusCode::BAD_REQUEST,
                format!("Invalid {field}"),
                source.to_string(),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad request".to_string(),
                msg.clone(),
            ),
            AppError::Body(rejection) => (
                rejection.status(),
                "Invalid request body".to_string(),
                rejection.body_text(),
            ),
            AppError::ZeroResults(subject) => (
                StatusCode::NOT_FOUND,
                format!("Error getting {subject}"),
                ZERO_RESULTS.to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(ApiFailure { mssg, err })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, ApiFailure) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_zero_results_body() {
        let (status, body) = body_of(AppError::ZeroResults("skills")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.mssg, "Error getting skills");
        assert_eq!(body.err, ZERO_RESULTS);
    }

    #[tokio::test]
    async fn test_validation_body_names_field() {
        let (status, body) =
            body_of(AppError::invalid("summary", ValidationError::TooLong(280))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.mssg, "Invalid summary");
        assert_eq!(body.err, "must be at most 280 characters");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let (status, body) = body_of(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.err, "A database error occurred");
    }
}
