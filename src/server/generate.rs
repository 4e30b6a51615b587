use std::sync::Arc;

use axum::extract::{Query, State};

use crate::core::assemble::{assemble_by_share, assemble_by_token};
use crate::server::AppState;
use crate::server::dto::{GenerateByShareParams, GenerateByTokenParams};
use crate::server::response::ApiError;

/// Anonymous generation through a plan access token. The assembled
/// document goes to the renderer and the rendered result is relayed
/// verbatim.
pub async fn generate_by_plan_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateByTokenParams>,
) -> Result<String, ApiError> {
    let document = assemble_by_token(state.store.as_ref(), &params.token)?;
    let rendered = state.renderer.generate(&document.to_json()?).await?;
    Ok(rendered)
}

/// Anonymous generation through a plan share link.
pub async fn generate_by_plan_share(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateByShareParams>,
) -> Result<String, ApiError> {
    let document = assemble_by_share(state.store.as_ref(), params.share_id)?;
    let rendered = state.renderer.generate(&document.to_json()?).await?;
    Ok(rendered)
}
