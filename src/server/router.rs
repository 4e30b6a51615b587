use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use super::{configs, favorites, generate, plans, shares, users};
use crate::auth::PasswordHasher;
use crate::rpc::RendererClient;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: PasswordHasher,
    pub renderer: RendererClient,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Accounts
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        // Configs
        .route("/configs", post(configs::create_config))
        .route("/configs", get(configs::list_configs))
        .route("/configs/{id}", get(configs::get_config))
        .route("/configs/{id}", patch(configs::update_config))
        .route("/configs/{id}", delete(configs::delete_config))
        // Config shares
        .route("/configs/{id}/shares", get(shares::list_config_shares))
        .route("/configs/{id}/shares", post(shares::create_config_share))
        .route("/config-shares/{id}", patch(shares::update_config_share))
        .route("/config-shares/{id}", delete(shares::revoke_config_share))
        // Plans
        .route("/plans", post(plans::create_plan))
        .route("/plans", get(plans::list_plans))
        .route("/plans/{id}", get(plans::get_plan))
        .route("/plans/{id}", patch(plans::update_plan))
        .route("/plans/{id}", delete(plans::delete_plan))
        .route("/shared-plans/{share_id}", get(plans::get_plan_by_share))
        // Plan membership
        .route(
            "/plans/{id}/configs/{config_id}",
            put(plans::add_plan_config),
        )
        .route(
            "/plans/{id}/configs/{config_id}",
            delete(plans::remove_plan_config),
        )
        .route(
            "/plans/{id}/config-shares/{share_id}",
            put(plans::add_plan_config_share),
        )
        .route(
            "/plans/{id}/config-shares/{share_id}",
            delete(plans::remove_plan_config_share),
        )
        // Plan access tokens
        .route("/plans/{id}/tokens", post(plans::create_plan_token))
        .route("/plans/{id}/tokens", get(plans::list_plan_tokens))
        .route("/plan-tokens/{token}", delete(plans::revoke_plan_token))
        // Plan shares
        .route("/plans/{id}/shares", get(shares::list_plan_shares))
        .route("/plans/{id}/shares", post(shares::create_plan_share))
        .route("/plan-shares/{id}", patch(shares::update_plan_share))
        .route("/plan-shares/{id}", delete(shares::revoke_plan_share))
        // Favorites
        .route(
            "/favorites/configs",
            get(favorites::list_favorite_configs),
        )
        .route(
            "/favorites/configs/{share_id}",
            put(favorites::add_favorite_config),
        )
        .route(
            "/favorites/configs/{share_id}",
            delete(favorites::remove_favorite_config),
        )
        .route("/favorites/plans", get(favorites::list_favorite_plans))
        .route(
            "/favorites/plans/{share_id}",
            put(favorites::add_favorite_plan),
        )
        .route(
            "/favorites/plans/{share_id}",
            delete(favorites::remove_favorite_plan),
        )
        // Generation (anonymous)
        .route(
            "/generate-by-plan-token",
            get(generate::generate_by_plan_token),
        )
        .route(
            "/generate-by-plan-share",
            get(generate::generate_by_plan_share),
        )
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
