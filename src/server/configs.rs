use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::RequireUser;
use crate::core::clamp_page;
use crate::core::ownership::{ResourceKind, verify_ownership};
use crate::server::AppState;
use crate::server::dto::{CreateConfigRequest, IdResponse, ListParams, UpdateConfigRequest};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::{CallerIdentity, Config, SortBy};

pub async fn create_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConfigRequest>,
) -> Result<ApiResponse<IdResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }

    let id = state.store.create_config(
        auth.user.id,
        req.kind,
        &req.name,
        &req.content,
        req.format,
        &req.remark,
    )?;

    Ok(ApiResponse::created(IdResponse { id }))
}

pub async fn get_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Config>, ApiError> {
    let store = state.store.as_ref();
    let caller = CallerIdentity::User(auth.user.id);

    verify_ownership(store, ResourceKind::Config, id, caller)?;
    let config = store
        .get_config(id)?
        .ok_or_else(|| ApiError::not_found("not found"))?;

    Ok(ApiResponse::ok(config))
}

pub async fn list_configs(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<Config>>, ApiError> {
    let (offset, count) = clamp_page(params.offset, params.count);
    let sort = SortBy::parse(params.sort.as_deref().unwrap_or(""));

    let configs = state.store.list_configs(auth.user.id, sort, offset, count)?;
    Ok(ApiResponse::ok(configs))
}

pub async fn update_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateConfigRequest>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let store = state.store.as_ref();
    let caller = CallerIdentity::User(auth.user.id);

    verify_ownership(store, ResourceKind::Config, id, caller)?;
    store.update_config(id, &req.name, &req.content, req.format, &req.remark)?;

    Ok(ApiResponse::ok("modified"))
}

pub async fn delete_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let store = state.store.as_ref();
    let caller = CallerIdentity::User(auth.user.id);

    verify_ownership(store, ResourceKind::Config, id, caller)?;
    store.soft_delete_config(id)?;

    Ok(ApiResponse::ok("removed"))
}
