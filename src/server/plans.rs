use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::RequireUser;
use crate::core::clamp_page;
use crate::core::ownership::{ResourceKind, verify_ownership};
use crate::core::relation::{RelationTarget, add_relation, remove_relation};
use crate::core::token;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    CreatePlanRequest, IdResponse, ListParams, PlanDetailResponse, TokenResponse,
    UpdatePlanRequest,
};
use crate::server::response::{ApiError, ApiResponse};
use crate::store::Store;
use crate::types::{CallerIdentity, Plan, PlanToken, SortBy};

pub async fn create_plan(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<ApiResponse<IdResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }

    let id = state.store.create_plan(auth.user.id, &req.name, &req.remark)?;
    Ok(ApiResponse::created(IdResponse { id }))
}

pub async fn list_plans(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<Plan>>, ApiError> {
    let (offset, count) = clamp_page(params.offset, params.count);
    let sort = SortBy::parse(params.sort.as_deref().unwrap_or(""));

    let plans = state.store.list_plans(auth.user.id, sort, offset, count)?;
    Ok(ApiResponse::ok(plans))
}

fn plan_detail(store: &dyn Store, plan_id: i64) -> Result<PlanDetailResponse, Error> {
    let plan = store.get_plan(plan_id)?.ok_or(Error::NotFound)?;
    if plan.deleted {
        return Err(Error::NotFound);
    }

    let configs = store.list_plan_direct_configs(plan_id)?;
    let shared_configs = store
        .list_plan_shared_configs(plan_id)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(PlanDetailResponse {
        plan,
        configs,
        shared_configs,
    })
}

pub async fn get_plan(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<PlanDetailResponse>, ApiError> {
    let store = state.store.as_ref();
    let caller = CallerIdentity::User(auth.user.id);

    verify_ownership(store, ResourceKind::Plan, id, caller)?;
    Ok(ApiResponse::ok(plan_detail(store, id)?))
}

/// Anonymous plan detail through a live share link.
pub async fn get_plan_by_share(
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<i64>,
) -> Result<ApiResponse<PlanDetailResponse>, ApiError> {
    let store = state.store.as_ref();

    let share = store.get_plan_share(share_id)?.ok_or(Error::NotFound)?;
    if share.deleted {
        return Err(Error::NotFound.into());
    }

    Ok(ApiResponse::ok(plan_detail(store, share.plan_id)?))
}

pub async fn update_plan(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let store = state.store.as_ref();
    let caller = CallerIdentity::User(auth.user.id);

    verify_ownership(store, ResourceKind::Plan, id, caller)?;
    store.update_plan(id, &req.name, &req.remark)?;

    Ok(ApiResponse::ok("modified"))
}

pub async fn delete_plan(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let store = state.store.as_ref();
    let caller = CallerIdentity::User(auth.user.id);

    verify_ownership(store, ResourceKind::Plan, id, caller)?;
    store.soft_delete_plan(id)?;

    Ok(ApiResponse::ok("removed"))
}

// Membership

pub async fn add_plan_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((plan_id, config_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    add_relation(
        state.store.as_ref(),
        plan_id,
        RelationTarget::Config(config_id),
        caller,
    )?;
    Ok(ApiResponse::ok("added"))
}

pub async fn remove_plan_config(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((plan_id, config_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    remove_relation(
        state.store.as_ref(),
        plan_id,
        RelationTarget::Config(config_id),
        caller,
    )?;
    Ok(ApiResponse::ok("removed"))
}

pub async fn add_plan_config_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((plan_id, share_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    add_relation(
        state.store.as_ref(),
        plan_id,
        RelationTarget::ConfigShare(share_id),
        caller,
    )?;
    Ok(ApiResponse::ok("added"))
}

pub async fn remove_plan_config_share(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((plan_id, share_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    remove_relation(
        state.store.as_ref(),
        plan_id,
        RelationTarget::ConfigShare(share_id),
        caller,
    )?;
    Ok(ApiResponse::ok("removed"))
}

// Access tokens

pub async fn create_plan_token(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<i64>,
) -> Result<ApiResponse<TokenResponse>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let token = token::issue_plan_token(state.store.as_ref(), plan_id, caller)?;
    Ok(ApiResponse::created(TokenResponse { token }))
}

pub async fn list_plan_tokens(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<i64>,
) -> Result<ApiResponse<Vec<PlanToken>>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    let tokens = token::list_plan_tokens(state.store.as_ref(), plan_id, caller)?;
    Ok(ApiResponse::ok(tokens))
}

pub async fn revoke_plan_token(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<ApiResponse<&'static str>, ApiError> {
    let caller = CallerIdentity::User(auth.user.id);
    token::revoke_plan_token(state.store.as_ref(), &token, caller)?;
    Ok(ApiResponse::ok("revoked"))
}
