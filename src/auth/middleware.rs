use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::token::resolve_session;
use crate::server::AppState;
use crate::types::{CallerIdentity, User};

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "token";

/// Extractor that requires a logged-in caller.
pub struct RequireUser {
    pub user: User,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthenticated,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({
            "status": status.as_u16(),
            "data": null,
            "error": message,
            "time": chrono::Utc::now(),
        });

        (status, Json(body)).into_response()
    }
}

/// Pulls a cookie value out of the Cookie header(s).
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else { continue };
        for pair in value.split(';') {
            if let Some((k, v)) = pair.trim().split_once('=') {
                if k == name {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

fn resolve_identity(parts: &Parts, state: &Arc<AppState>) -> Result<CallerIdentity, AuthError> {
    let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE) else {
        return Ok(CallerIdentity::Anonymous);
    };

    resolve_session(state.store.as_ref(), &token).map_err(|e| {
        tracing::error!("failed to resolve session: {e}");
        AuthError::InternalError
    })
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = resolve_identity(parts, state)?;

        let user_id = identity.user_id().ok_or(AuthError::Unauthenticated)?;
        let user = state
            .store
            .get_user(user_id)
            .map_err(|e| {
                tracing::error!("failed to load user {user_id}: {e}");
                AuthError::InternalError
            })?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(RequireUser { user })
    }
}
