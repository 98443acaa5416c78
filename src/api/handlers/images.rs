//! Image handlers

use super::ApiResult;
use crate::api::{error::ApiError, session::CurrentSession, state::AppState, types::ApiResponse};
use crate::store::ImageInfo;
use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Raw image bytes served with their stored content type
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let image = state
        .store
        .get_image(&id)
        .ok_or_else(|| ApiError::not_found_item("Image", id))?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
}

/// Image metadata
pub async fn get_image_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ImageInfo> {
    state
        .store
        .get_image(&id)
        .map(|image| Json(ApiResponse::success(image.info())))
        .ok_or_else(|| ApiError::not_found_item("Image", id))
}

/// Upload an image from the raw request body
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
    body: Body,
) -> ApiResult<ImageInfo> {
    let rules = &state.config.images;

    let account = state
        .store
        .get_account(session.account_id())
        .ok_or(ApiError::InvalidSession)?;
    if rules.upload_requires_admin && !account.is_admin {
        return Err(ApiError::ForbiddenRoles("Admin".to_string()));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if !rules.allowed_types.iter().any(|allowed| allowed == &content_type) {
        return Err(ApiError::BadRequest(format!(
            "File must be one of: {}",
            rules.allowed_types.join(", ")
        )));
    }

    let too_large = || ApiError::BadRequest(format!("File must be at most {} bytes", rules.max_bytes));

    let declared_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared_length.is_some_and(|length| length > rules.max_bytes) {
        debug!("Rejecting upload with declared length {:?}", declared_length);
        return Err(too_large());
    }

    let data = to_bytes(body, rules.max_bytes).await.map_err(|_| too_large())?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("File cannot be empty".to_string()));
    }

    let image = state.store.add_image(&content_type, data, &account.username);
    info!("Image {} uploaded by '{}'", image.id, account.username);
    Ok(Json(ApiResponse::success(image.info())))
}
