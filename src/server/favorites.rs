use std::sync::Arc;

use axum::extract::{Path, Query, State};

use crate::auth::RequireUser;
use crate::core::favorite;
use crate::server::AppState;
use crate::server::dto::ListParams;
use crate::server::response::{ApiError, ApiResponse};
use crate::types::{CallerIdentity, FavoriteConfigSummary, FavoritePlanSummary};

pub async fn add_favorite_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    favorite::add_favorite_config(state.store.as_ref(), share_id, caller)?;
    Ok(ApiResponse::created("favored"))
}

pub async fn remove_favorite_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    favorite::remove_favorite_config(state.store.as_ref(), share_id, caller)?;
    Ok(ApiResponse::ok("removed"))
}

pub async fn list_favorite_configs(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<FavoriteConfigSummary>>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let favorites = favorite::list_favorite_configs(
        state.store.as_ref(),
        caller,
        params.offset,
        params.count,
    )?;
    Ok(ApiResponse::ok(favorites))
}

pub async fn add_favorite_plan(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    favorite::add_favorite_plan(state.store.as_ref(), share_id, caller)?;
    Ok(ApiResponse::created("favored"))
}

pub async fn remove_favorite_plan(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    favorite::remove_favorite_plan(state.store.as_ref(), share_id, caller)?;
    Ok(ApiResponse::ok("removed"))
}

pub async fn list_favorite_plans(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<FavoritePlanSummary>>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let favorites =
        favorite::list_favorite_plans(state.store.as_ref(), caller, params.offset, params.count)?;
    Ok(ApiResponse::ok(favorites))
}
