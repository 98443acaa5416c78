//! API Handlers

pub mod health;
pub mod images;
pub mod notifications;
pub mod users;

use super::{error::ApiError, types::ApiResponse};
use axum::Json;

/// Result type returned by JSON handlers
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
