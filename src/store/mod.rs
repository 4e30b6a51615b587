mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// A config reachable through a share, carrying the share id it was
/// reached by (the config's own id stays private to its owner).
#[derive(Debug, Clone)]
pub struct SharedConfig {
    pub share_id: i64,
    pub config: Config,
}

/// Store defines the database interface.
///
/// Mutating methods that pair a check with a write (relation adds, plan
/// token issuance, login replacement) run inside a single transaction so
/// concurrent requests cannot both pass the check; key-pair primary keys
/// are the backstop and surface as `Error::Conflict`.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        nickname: &str,
    ) -> Result<i64>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // Config operations
    fn create_config(
        &self,
        owner_id: i64,
        kind: ConfigKind,
        name: &str,
        content: &str,
        format: ConfigFormat,
        remark: &str,
    ) -> Result<i64>;
    /// Returns the row regardless of its deleted flag; callers decide
    /// visibility. Ownership checks go through `config_owner` instead.
    fn get_config(&self, id: i64) -> Result<Option<Config>>;
    /// Owner of a live config. `None` covers absent and soft-deleted alike.
    fn config_owner(&self, id: i64) -> Result<Option<i64>>;
    fn list_configs(
        &self,
        owner_id: i64,
        sort: SortBy,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Config>>;
    /// Kind is immutable; everything else user-visible is replaced.
    fn update_config(
        &self,
        id: i64,
        name: &str,
        content: &str,
        format: ConfigFormat,
        remark: &str,
    ) -> Result<()>;
    fn soft_delete_config(&self, id: i64) -> Result<()>;

    // Config share operations
    fn create_config_share(&self, config_id: i64, remark: &str) -> Result<i64>;
    fn get_config_share(&self, id: i64) -> Result<Option<ConfigShare>>;
    /// Owner of the config behind a live share (both hops live).
    fn config_share_owner(&self, id: i64) -> Result<Option<i64>>;
    fn update_config_share_remark(&self, id: i64, remark: &str) -> Result<()>;
    fn soft_delete_config_share(&self, id: i64) -> Result<()>;
    fn list_config_shares(&self, config_id: i64) -> Result<Vec<ShareSummary>>;

    // Plan operations
    fn create_plan(&self, owner_id: i64, name: &str, remark: &str) -> Result<i64>;
    fn get_plan(&self, id: i64) -> Result<Option<Plan>>;
    fn plan_owner(&self, id: i64) -> Result<Option<i64>>;
    fn list_plans(
        &self,
        owner_id: i64,
        sort: SortBy,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Plan>>;
    fn update_plan(&self, id: i64, name: &str, remark: &str) -> Result<()>;
    fn soft_delete_plan(&self, id: i64) -> Result<()>;

    // Plan membership (each mutation also bumps the plan's modified_at,
    // in the same transaction as the relation row change)
    fn add_plan_config_relation(&self, plan_id: i64, config_id: i64) -> Result<()>;
    fn remove_plan_config_relation(&self, plan_id: i64, config_id: i64) -> Result<bool>;
    fn add_plan_share_relation(&self, plan_id: i64, config_share_id: i64) -> Result<()>;
    fn remove_plan_share_relation(&self, plan_id: i64, config_share_id: i64) -> Result<bool>;
    /// Live configs directly related to the plan, ascending config id.
    fn list_plan_direct_configs(&self, plan_id: i64) -> Result<Vec<Config>>;
    /// Live configs reachable via live shares, ascending share id.
    fn list_plan_shared_configs(&self, plan_id: i64) -> Result<Vec<SharedConfig>>;

    // Plan share operations
    fn create_plan_share(&self, plan_id: i64, remark: &str) -> Result<i64>;
    fn get_plan_share(&self, id: i64) -> Result<Option<PlanShare>>;
    fn plan_share_owner(&self, id: i64) -> Result<Option<i64>>;
    fn update_plan_share_remark(&self, id: i64, remark: &str) -> Result<()>;
    fn soft_delete_plan_share(&self, id: i64) -> Result<()>;
    fn list_plan_shares(&self, plan_id: i64) -> Result<Vec<ShareSummary>>;

    // Session token operations
    /// Deletes any prior tokens for the user and inserts the new one,
    /// in one transaction (single active session policy).
    fn replace_login_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
    fn get_login_token(&self, token: &str) -> Result<Option<LoginToken>>;
    fn delete_login_token(&self, token: &str) -> Result<()>;
    fn purge_expired_login_tokens(&self, now: DateTime<Utc>) -> Result<usize>;

    // Plan token operations
    /// Counts and inserts inside one immediate transaction; fails with
    /// `LimitExceeded` once `cap` tokens exist for the plan.
    fn create_plan_token(&self, plan_id: i64, token: &str, cap: i64) -> Result<()>;
    fn get_plan_token(&self, token: &str) -> Result<Option<PlanToken>>;
    /// Plan id behind a token, only if the plan is live.
    fn resolve_plan_token(&self, token: &str) -> Result<Option<i64>>;
    fn delete_plan_token(&self, token: &str) -> Result<bool>;
    fn list_plan_tokens(&self, plan_id: i64) -> Result<Vec<PlanToken>>;

    // Favorite operations
    fn add_favorite_config(&self, user_id: i64, config_share_id: i64) -> Result<()>;
    fn remove_favorite_config(&self, user_id: i64, config_share_id: i64) -> Result<bool>;
    fn list_favorite_configs(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FavoriteConfigSummary>>;
    fn add_favorite_plan(&self, user_id: i64, plan_share_id: i64) -> Result<()>;
    fn remove_favorite_plan(&self, user_id: i64, plan_share_id: i64) -> Result<bool>;
    fn list_favorite_plans(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FavoritePlanSummary>>;
}
