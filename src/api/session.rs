//! Session header extraction

use super::{error::ApiError, state::AppState};
use crate::auth::{Session, SessionId};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName},
};
use std::convert::Infallible;
use tracing::debug;

/// Session id presented by the caller.
///
/// A missing or unparsable header becomes the nil id, which never resolves
/// to a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionHeader(pub SessionId);

/// The caller's active session; rejects with 401 when there is none
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// Read the session id from `headers`
pub fn session_id_from_headers(headers: &HeaderMap, name: &HeaderName) -> SessionId {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<SessionId>().ok())
        .unwrap_or_else(SessionId::nil)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionHeader {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(session_id_from_headers(&parts.headers, &state.session_header)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = session_id_from_headers(&parts.headers, &state.session_header);

        match state.sessions.find_session(&id) {
            Some(session) => Ok(Self(session)),
            None => {
                debug!("Request to {} without a valid session", parts.uri.path());
                Err(ApiError::InvalidSession)
            }
        }
    }
}
