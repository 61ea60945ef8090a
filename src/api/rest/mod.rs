//! REST API module for HTTP endpoints
//!
//! Routes mirror the platform's public surface: auth, polls, options,
//! votes, likes, admin, analytics. Handlers return domain data as JSON
//! and map [`StoreError`] onto HTTP status codes via [`ErrorResponse`].

pub mod admin;
pub mod analytics;
pub mod likes;
pub mod options;
pub mod polls;
pub mod users;
pub mod votes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// API error body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

/// An error with the status code it maps to; handlers bubble store
/// failures into this with `?`
#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ApiError,
}

impl ErrorResponse {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ApiError::new("UNAUTHORIZED", message),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: ApiError::new("FORBIDDEN", message),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ApiError::new("NOT_FOUND", message),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<StoreError> for ErrorResponse {
    fn from(err: StoreError) -> Self {
        let (status, code) = match &err {
            StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            StoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            StoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            StoreError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            StoreError::Invalid(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            StoreError::Io(_) | StoreError::Serde(_) | StoreError::Password(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        Self {
            status,
            body: ApiError::new(code, err.to_string()),
        }
    }
}

/// Identifies the acting user on mutation endpoints
#[derive(Debug, Deserialize)]
pub struct UserParam {
    pub user_id: i64,
}

/// Optional viewer on read endpoints; fills `user_voted`/`user_liked`
#[derive(Debug, Default, Deserialize)]
pub struct ViewerParam {
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status_mapping() {
        let resp = ErrorResponse::from(StoreError::NotFound("Poll"));
        assert_eq!(resp.status, StatusCode::NOT_FOUND);

        let resp = ErrorResponse::from(StoreError::Conflict("taken".to_string()));
        assert_eq!(resp.status, StatusCode::CONFLICT);

        let resp = ErrorResponse::from(StoreError::Forbidden("no".to_string()));
        assert_eq!(resp.status, StatusCode::FORBIDDEN);

        let resp = ErrorResponse::from(StoreError::InvalidCredentials);
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }
}
