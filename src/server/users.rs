use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Response},
};

use crate::auth::{SESSION_COOKIE, cookie_value};
use crate::core::token::{SESSION_TTL_HOURS, issue_session, revoke_session};
use crate::server::AppState;
use crate::server::dto::{IdResponse, LoginRequest, RegisterRequest};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::User;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<ApiResponse<IdResponse>, ApiError> {
    let username = req.username.trim();
    if username.is_empty() || username.contains(char::is_whitespace) {
        return Err(ApiError::bad_request("invalid username"));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password must not be empty"));
    }
    if !req.email.contains('@') {
        return Err(ApiError::bad_request("invalid email"));
    }

    let hash = state.hasher.hash(&req.password)?;
    let nickname = if req.nickname.is_empty() {
        username
    } else {
        req.nickname.as_str()
    };

    let id = state
        .store
        .create_user(username, &req.email, &hash, nickname)?;

    Ok(ApiResponse::created(IdResponse { id }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let store = state.store.as_ref();

    // same answer for unknown user and wrong password
    let user = store
        .get_user_by_username(&req.username)?
        .ok_or_else(|| ApiError::bad_request("wrong username or password"))?;

    if !state.hasher.verify(&req.password, &user.password_hash)? {
        return Err(ApiError::bad_request("wrong username or password"));
    }

    let token = issue_session(store, user.id, SESSION_TTL_HOURS)?;

    let mut response = ApiResponse::<User>::ok(user).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
            .parse()
            .map_err(|_| ApiError::internal("invalid cookie value"))?,
    );
    Ok(response)
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        revoke_session(state.store.as_ref(), &token)?;
    }

    let mut response = ApiResponse::ok("logged out").into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
            .parse()
            .map_err(|_| ApiError::internal("invalid cookie value"))?,
    );
    Ok(response)
}
