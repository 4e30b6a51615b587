use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of a config fragment. A plan merges exactly one global fragment
/// with an ordered list of lesson fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum ConfigKind {
    Global,
    Lesson,
}

impl From<ConfigKind> for i64 {
    fn from(kind: ConfigKind) -> i64 {
        match kind {
            ConfigKind::Global => 1,
            ConfigKind::Lesson => 2,
        }
    }
}

impl TryFrom<i64> for ConfigKind {
    type Error = Error;

    fn try_from(v: i64) -> Result<Self, Error> {
        match v {
            1 => Ok(ConfigKind::Global),
            2 => Ok(ConfigKind::Lesson),
            _ => Err(Error::BadRequest(format!("invalid config kind: {v}"))),
        }
    }
}

/// Content format tag. Opaque to the core; the renderer interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl From<ConfigFormat> for i64 {
    fn from(format: ConfigFormat) -> i64 {
        match format {
            ConfigFormat::Json => 1,
            ConfigFormat::Toml => 2,
        }
    }
}

impl TryFrom<i64> for ConfigFormat {
    type Error = Error;

    fn try_from(v: i64) -> Result<Self, Error> {
        match v {
            1 => Ok(ConfigFormat::Json),
            2 => Ok(ConfigFormat::Toml),
            _ => Err(Error::BadRequest(format!("invalid config format: {v}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub nickname: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub id: i64,
    pub owner_id: i64,
    pub kind: ConfigKind,
    pub name: String,
    pub content: String,
    pub format: ConfigFormat,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigShare {
    pub id: i64,
    pub config_id: i64,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on field edits and on any membership change.
    pub modified_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanShare {
    pub id: i64,
    pub plan_id: i64,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginToken {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip)]
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanToken {
    pub id: i64,
    pub plan_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// A live share of a resource the caller owns, as returned by the share
/// listing operations.
#[derive(Debug, Clone, Serialize)]
pub struct ShareSummary {
    pub id: i64,
    pub remark: String,
    pub created_at: DateTime<Utc>,
}

/// A favorited config share joined through to its live config.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteConfigSummary {
    pub share_id: i64,
    pub favored_at: DateTime<Utc>,
    pub name: String,
    pub remark: String,
    pub kind: ConfigKind,
    pub format: ConfigFormat,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A favorited plan share joined through to its live plan.
#[derive(Debug, Clone, Serialize)]
pub struct FavoritePlanSummary {
    pub share_id: i64,
    pub favored_at: DateTime<Utc>,
    pub name: String,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Sort keys accepted by the owner-scoped listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Id,
    Name,
    CreateTime,
    ModifyTime,
}

impl SortBy {
    /// Maps a client-supplied sort key onto a whitelisted column name.
    /// Unknown keys fall back to the id column.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => SortBy::Name,
            "createTime" => SortBy::CreateTime,
            "modifyTime" => SortBy::ModifyTime,
            _ => SortBy::Id,
        }
    }

    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            SortBy::Id => "id",
            SortBy::Name => "name",
            SortBy::CreateTime => "created_at",
            SortBy::ModifyTime => "modified_at",
        }
    }
}
