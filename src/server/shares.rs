use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::RequireUser;
use crate::core::share;
use crate::server::AppState;
use crate::server::dto::{IdResponse, RemarkRequest, ShareRequest};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::{CallerIdentity, ShareSummary};

// Config shares

pub async fn create_config_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<i64>,
    Json(req): Json<ShareRequest>,
) -> Result<ApiResponse<IdResponse>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let id = share::create_config_share(state.store.as_ref(), config_id, &req.remark, caller)?;
    Ok(ApiResponse::created(IdResponse { id }))
}

pub async fn list_config_shares(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<i64>,
) -> Result<ApiResponse<Vec<ShareSummary>>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let shares = share::list_config_shares(state.store.as_ref(), config_id, caller)?;
    Ok(ApiResponse::ok(shares))
}

pub async fn update_config_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
    Json(req): Json<RemarkRequest>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    share::update_config_share(state.store.as_ref(), share_id, &req.remark, caller)?;
    Ok(ApiResponse::ok("modified"))
}

pub async fn revoke_config_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    share::revoke_config_share(state.store.as_ref(), share_id, caller)?;
    Ok(ApiResponse::ok("revoked"))
}

// Plan shares

pub async fn create_plan_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<i64>,
    Json(req): Json<ShareRequest>,
) -> Result<ApiResponse<IdResponse>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let id = share::create_plan_share(state.store.as_ref(), plan_id, &req.remark, caller)?;
    Ok(ApiResponse::created(IdResponse { id }))
}

pub async fn list_plan_shares(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<i64>,
) -> Result<ApiResponse<Vec<ShareSummary>>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let shares = share::list_plan_shares(state.store.as_ref(), plan_id, caller)?;
    Ok(ApiResponse::ok(shares))
}

pub async fn update_plan_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
    Json(req): Json<RemarkRequest>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    share::update_plan_share(state.store.as_ref(), share_id, &req.remark, caller)?;
    Ok(ApiResponse::ok("modified"))
}

pub async fn revoke_plan_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    share::revoke_plan_share(state.store.as_ref(), share_id, caller)?;
    Ok(ApiResponse::ok("revoked"))
}
