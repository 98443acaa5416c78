//! User and session handlers

use super::ApiResult;
use crate::api::{
    error::ApiError,
    session::{CurrentSession, SessionHeader},
    state::AppState,
    types::*,
};
use crate::auth::LoginOutcome;
use crate::store::Account;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

/// Directory of accounts, filtered by username substring
pub async fn directory(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Json<ApiResponse<Vec<Account>>> {
    let paging = &state.config.directory;
    let take = query.take.unwrap_or(paging.default_take).min(paging.max_take);
    let skip = query.skip.unwrap_or(0);

    Json(ApiResponse::success(
        state.store.directory(query.query.as_deref(), skip, take),
    ))
}

/// Account behind the presented session
pub async fn current_user(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Account> {
    get_user(State(state), Path(session.account_id().to_string())).await
}

/// A single account
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Account> {
    state
        .store
        .get_account(&id)
        .map(|account| Json(ApiResponse::success(account)))
        .ok_or_else(|| ApiError::NotFound("User was not found".to_string()))
}

/// Change the caller's own password.
///
/// Other sessions of the account stay logged in.
pub async fn change_password(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Account> {
    let (Some(current), Some(new)) = (request.current, request.new) else {
        return Err(ApiError::BadRequest("Cannot have empty passwords".to_string()));
    };
    if current.is_empty() || new.is_empty() {
        return Err(ApiError::BadRequest("Cannot have empty passwords".to_string()));
    }

    let account_id = session.account_id();
    if !state.sessions.check_credential(account_id, &current)? {
        return Err(ApiError::BadRequest("Incorrect current password".to_string()));
    }

    state.sessions.update_credential(account_id, &new)?;
    get_user(State(state), Path(account_id.to_string())).await
}

/// Administrator resets another account's password
pub async fn reset_password(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Account> {
    let new = match request.new {
        Some(new) if !new.is_empty() => new,
        _ => return Err(ApiError::BadRequest("Cannot have empty password".to_string())),
    };

    let executor = state
        .store
        .get_account(session.account_id())
        .ok_or(ApiError::InvalidSession)?;
    if !executor.is_admin {
        return Err(ApiError::ForbiddenRoles("Admin".to_string()));
    }

    if state.store.get_account(&id).is_none() {
        return Err(ApiError::not_found_item("User", &id));
    }

    state.sessions.update_credential(&id, &new)?;
    state.store.notify(
        &id,
        format!("Your password was reset by administrator '{}'", executor.username),
    );
    info!("Password of '{}' reset by '{}'", id, executor.username);

    get_user(State(state), Path(id)).await
}

/// Set the caller's profile image URL
pub async fn update_image(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(image_url): Json<String>,
) -> ApiResult<Account> {
    state
        .store
        .set_image_url(session.account_id(), image_url)
        .map(|account| Json(ApiResponse::success(account)))
        .ok_or(ApiError::InvalidSession)
}

/// Log in and receive a session id
pub async fn log_in(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<LoginResponse> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(ApiError::BadRequest("Username or password was empty".to_string()));
    };

    match state.sessions.log_in(username.trim(), &password)? {
        LoginOutcome::Authenticated(session_id) => {
            state.metrics.record_login();
            Ok(Json(ApiResponse::success(LoginResponse { session_id })))
        }
        LoginOutcome::Rejected => {
            state.metrics.record_rejection();
            Err(ApiError::Rejected)
        }
    }
}

/// Register a new account; the first one becomes administrator
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<Account> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(ApiError::BadRequest("Username or password was empty".to_string()));
    };

    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Username or password was empty".to_string()));
    }

    let credential = state.sessions.verifier().hash(&password)?;
    let account = state.store.create_account(username, credential)?;
    Ok(Json(ApiResponse::success(account)))
}

/// End the presented session
pub async fn log_out(
    State(state): State<AppState>,
    SessionHeader(id): SessionHeader,
) -> Json<ApiResponse<bool>> {
    let ended = state.sessions.log_out(&id);
    if ended {
        state.metrics.record_logouts(1);
    }
    Json(ApiResponse::success(ended))
}

/// End every session of the caller's account
pub async fn log_out_all(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<ApiResponse<usize>> {
    let count = state.sessions.log_out_all(session.account_id());
    state.metrics.record_logouts(count);
    Json(ApiResponse::success(count))
}
