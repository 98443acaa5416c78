//! Notification handlers

use crate::api::{session::CurrentSession, state::AppState, types::ApiResponse};
use crate::store::Notification;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

/// All notifications of the caller
pub async fn get_all(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<ApiResponse<Vec<Notification>>> {
    Json(ApiResponse::success(
        state.store.notifications_for(session.account_id()),
    ))
}

/// Delete one of the caller's notifications
pub async fn delete_one(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<usize>> {
    Json(ApiResponse::success(
        state.store.delete_notification(session.account_id(), &id),
    ))
}

/// Delete every notification of the caller
pub async fn delete_all(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<ApiResponse<usize>> {
    Json(ApiResponse::success(
        state.store.delete_all_notifications(session.account_id()),
    ))
}
