use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::SharedConfig;
use crate::types::{Config, ConfigFormat, ConfigKind, Plan};

fn default_count() -> i64 {
    crate::core::MAX_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateConfigRequest {
    pub kind: ConfigKind,
    pub name: String,
    pub content: String,
    pub format: ConfigFormat,
    #[serde(default)]
    pub remark: String,
}

/// Kind is deliberately absent: it is fixed at creation.
#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    pub name: String,
    pub content: String,
    pub format: ConfigFormat,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: String,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Deserialize)]
pub struct RemarkRequest {
    pub remark: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateByTokenParams {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateByShareParams {
    #[serde(rename = "shareId")]
    pub share_id: i64,
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// A config reached through a share, as shown in a plan detail. The
/// config's own id is withheld; the share id is the public handle.
#[derive(Debug, Serialize)]
pub struct SharedConfigDetail {
    pub share_id: i64,
    pub kind: ConfigKind,
    pub name: String,
    pub content: String,
    pub format: ConfigFormat,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<SharedConfig> for SharedConfigDetail {
    fn from(shared: SharedConfig) -> Self {
        let c = shared.config;
        Self {
            share_id: shared.share_id,
            kind: c.kind,
            name: c.name,
            content: c.content,
            format: c.format,
            remark: c.remark,
            created_at: c.created_at,
            modified_at: c.modified_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanDetailResponse {
    #[serde(flatten)]
    pub plan: Plan,
    pub configs: Vec<Config>,
    pub shared_configs: Vec<SharedConfigDetail>,
}
