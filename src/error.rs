//! API error taxonomy and HTTP mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl is
//! the single place where errors turn into status codes and JSON bodies.
//! Raw sqlx or reqwest messages never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::music_info::MusicInfoError;

/// Application-level error for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested song does not exist.
    #[error("song not found")]
    SongNotFound,

    /// A library query matched nothing.
    #[error("nothing found")]
    NothingFound,

    /// An update request that carries no field changes.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// A bad request with a human-readable message.
    #[error("{0}")]
    InvalidInput(String),

    /// A write that would duplicate an existing entry.
    #[error("{0}")]
    Conflict(String),

    /// The music info provider rejected the request.
    #[error("bad request")]
    UpstreamBadRequest,

    /// The music info provider did not answer in time.
    #[error("request took too long")]
    UpstreamTimeout,

    /// The music info provider failed in some other way.
    #[error("music info provider error: {0}")]
    Upstream(String),

    /// A database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for handler and service return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<MusicInfoError> for ApiError {
    fn from(err: MusicInfoError) -> Self {
        match err {
            MusicInfoError::BadRequest => ApiError::UpstreamBadRequest,
            MusicInfoError::Timeout => ApiError::UpstreamTimeout,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::SongNotFound => (StatusCode::NOT_FOUND, "song not found".to_string()),
            ApiError::NothingFound => (StatusCode::NOT_FOUND, "nothing found".to_string()),
            ApiError::NoFieldsToUpdate => {
                (StatusCode::BAD_REQUEST, "no fields to update".to_string())
            }
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::UpstreamBadRequest => (StatusCode::BAD_REQUEST, "bad request".to_string()),
            ApiError::UpstreamTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "request took too long".to_string(),
            ),
            ApiError::Upstream(msg) => {
                tracing::error!("music info provider error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({ "error": message });

        (status, Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and a client-safe message.
///
/// `RowNotFound` maps to 404, unique violations (Postgres 23505) to 409,
/// everything else to a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "song not found".to_string()),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            (StatusCode::CONFLICT, "entry already exists".to_string())
        }
        other => {
            tracing::error!("database error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_info_error_kinds_stay_distinct() {
        assert!(matches!(
            ApiError::from(MusicInfoError::BadRequest),
            ApiError::UpstreamBadRequest
        ));
        assert!(matches!(
            ApiError::from(MusicInfoError::Timeout),
            ApiError::UpstreamTimeout
        ));
        assert!(matches!(
            ApiError::from(MusicInfoError::Network("connection refused".to_string())),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(MusicInfoError::Http(503)),
            ApiError::Upstream(_)
        ));
    }

    #[test]
    fn test_upstream_timeout_answers_408() {
        let response = ApiError::from(MusicInfoError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_upstream_failure_answers_500() {
        let response = ApiError::from(MusicInfoError::Http(503)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
