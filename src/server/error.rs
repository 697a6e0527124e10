//! API error type mapped to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::AuthError;

/// Errors surfaced to HTTP callers.
///
/// Every variant renders as `{"message": ...}`; internal faults keep
/// their detail in the logs and send a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input, correctable by the caller.
    #[error("{0}")]
    Validation(String),
    /// Missing or invalid credential on an authenticated path.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Unexpected internal fault.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Auth(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            Self::Internal(detail) => {
                tracing::error!(%detail, "internal error handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error handling the request".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation("Question is required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Auth(AuthError::MissingCredential),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let response = ApiError::Internal("connection string leaked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
