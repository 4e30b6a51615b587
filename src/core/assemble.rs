use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::{Error, Result};
use crate::store::Store;

/// The merged content of a plan, handed to the renderer as
/// `{"global": ..., "lessons": [...]}`. Fragment contents are spliced in
/// verbatim; nothing here interprets them beyond JSON well-formedness.
#[derive(Debug, Serialize)]
pub struct MergedDocument {
    pub global: Option<Box<RawValue>>,
    pub lessons: Vec<Box<RawValue>>,
}

impl MergedDocument {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::BadRequest(format!("failed to serialize merged document: {e}")))
    }
}

fn raw_fragment(config_id: i64, content: &str) -> Result<Box<RawValue>> {
    RawValue::from_string(content.to_string())
        .map_err(|_| Error::BadRequest(format!("config {config_id} content is not valid JSON")))
}

/// Merges the live fragments of a live plan.
///
/// Scan order is fixed: direct configs first, then share-attached configs,
/// each set in ascending id order. Lessons accumulate in scan order; when
/// several global fragments are present the last one scanned wins. The
/// order is deterministic, so repeated assembly of an unchanged plan
/// yields an identical document.
pub fn assemble(store: &dyn Store, plan_id: i64) -> Result<MergedDocument> {
    let plan = store.get_plan(plan_id)?.ok_or(Error::NotFound)?;
    if plan.deleted {
        return Err(Error::NotFound);
    }

    let mut global = None;
    let mut lessons = Vec::new();

    for config in store.list_plan_direct_configs(plan_id)? {
        let fragment = raw_fragment(config.id, &config.content)?;
        match config.kind {
            crate::types::ConfigKind::Global => global = Some(fragment),
            crate::types::ConfigKind::Lesson => lessons.push(fragment),
        }
    }

    for shared in store.list_plan_shared_configs(plan_id)? {
        let config = shared.config;
        let fragment = raw_fragment(config.id, &config.content)?;
        match config.kind {
            crate::types::ConfigKind::Global => global = Some(fragment),
            crate::types::ConfigKind::Lesson => lessons.push(fragment),
        }
    }

    Ok(MergedDocument { global, lessons })
}

/// Assembles through a plan access token.
pub fn assemble_by_token(store: &dyn Store, token: &str) -> Result<MergedDocument> {
    let plan_id = super::token::resolve_plan_token(store, token)?;
    assemble(store, plan_id)
}

/// Assembles through a plan share link.
pub fn assemble_by_share(store: &dyn Store, share_id: i64) -> Result<MergedDocument> {
    let share = store.get_plan_share(share_id)?.ok_or(Error::NotFound)?;
    if share.deleted {
        return Err(Error::NotFound);
    }
    assemble(store, share.plan_id)
}
