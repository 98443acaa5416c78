//! API error mapping

use super::types::ApiResponse;
use crate::auth::AuthError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Failures a handler can report to the client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Session is invalid or has expired")]
    InvalidSession,

    #[error("Username or password was incorrect")]
    Rejected,

    #[error("Missing required role(s): {0}")]
    ForbiddenRoles(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found_item(item: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{} with ID '{}' was not found", item, id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidSession | ApiError::Rejected => StatusCode::UNAUTHORIZED,
            ApiError::ForbiddenRoles(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmptySecret => ApiError::BadRequest("Password cannot be empty".to_string()),
            AuthError::UnknownAccount(account) => ApiError::not_found_item("User", account),
            AuthError::Store(store) => store.into(),
            AuthError::Hashing(_) => {
                error!("Credential failure: {}", err);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::BadRequest("Username already in use".to_string()),
            StoreError::Unavailable(_) => {
                error!("Storage failure: {}", err);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
