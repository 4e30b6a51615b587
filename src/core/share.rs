use crate::error::Result;
use crate::store::Store;
use crate::types::{CallerIdentity, ShareSummary};

use super::ownership::{ResourceKind, verify_ownership};

/// Publishes a share of a config the caller owns.
pub fn create_config_share(
    store: &dyn Store,
    config_id: i64,
    remark: &str,
    caller: CallerIdentity,
) -> Result<i64> {
    verify_ownership(store, ResourceKind::Config, config_id, caller)?;
    store.create_config_share(config_id, remark)
}

pub fn update_config_share(
    store: &dyn Store,
    share_id: i64,
    remark: &str,
    caller: CallerIdentity,
) -> Result<()> {
    verify_ownership(store, ResourceKind::ConfigShare, share_id, caller)?;
    store.update_config_share_remark(share_id, remark)
}

/// Revokes a config share. Relations and favorites pointing at it are
/// left in place; reads filter them out from here on.
pub fn revoke_config_share(store: &dyn Store, share_id: i64, caller: CallerIdentity) -> Result<()> {
    verify_ownership(store, ResourceKind::ConfigShare, share_id, caller)?;
    store.soft_delete_config_share(share_id)
}

pub fn list_config_shares(
    store: &dyn Store,
    config_id: i64,
    caller: CallerIdentity,
) -> Result<Vec<ShareSummary>> {
    verify_ownership(store, ResourceKind::Config, config_id, caller)?;
    store.list_config_shares(config_id)
}

/// Publishes a share of a plan the caller owns.
pub fn create_plan_share(
    store: &dyn Store,
    plan_id: i64,
    remark: &str,
    caller: CallerIdentity,
) -> Result<i64> {
    verify_ownership(store, ResourceKind::Plan, plan_id, caller)?;
    store.create_plan_share(plan_id, remark)
}

pub fn update_plan_share(
    store: &dyn Store,
    share_id: i64,
    remark: &str,
    caller: CallerIdentity,
) -> Result<()> {
    verify_ownership(store, ResourceKind::PlanShare, share_id, caller)?;
    store.update_plan_share_remark(share_id, remark)
}

pub fn revoke_plan_share(store: &dyn Store, share_id: i64, caller: CallerIdentity) -> Result<()> {
    verify_ownership(store, ResourceKind::PlanShare, share_id, caller)?;
    store.soft_delete_plan_share(share_id)
}

pub fn list_plan_shares(
    store: &dyn Store,
    plan_id: i64,
    caller: CallerIdentity,
) -> Result<Vec<ShareSummary>> {
    verify_ownership(store, ResourceKind::Plan, plan_id, caller)?;
    store.list_plan_shares(plan_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::SqliteStore;
    use crate::types::{ConfigFormat, ConfigKind};

    fn setup() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        let alice = store
            .create_user("alice", "alice@example.com", "hash", "alice")
            .unwrap();
        let bob = store
            .create_user("bob", "bob@example.com", "hash", "bob")
            .unwrap();
        (store, alice, bob)
    }

    #[test]
    fn test_only_owner_shares() {
        let (store, alice, bob) = setup();
        let config_id = store
            .create_config(alice, ConfigKind::Global, "g", "{}", ConfigFormat::Json, "")
            .unwrap();

        let result = create_config_share(&store, config_id, "", CallerIdentity::User(bob));
        assert!(matches!(result, Err(Error::Forbidden)));

        create_config_share(&store, config_id, "", CallerIdentity::User(alice)).unwrap();
    }

    #[test]
    fn test_revoked_share_leaves_listing() {
        let (store, alice, _) = setup();
        let caller = CallerIdentity::User(alice);
        let plan_id = store.create_plan(alice, "p", "").unwrap();

        let s1 = create_plan_share(&store, plan_id, "first", caller).unwrap();
        let s2 = create_plan_share(&store, plan_id, "second", caller).unwrap();

        revoke_plan_share(&store, s1, caller).unwrap();

        let shares = list_plan_shares(&store, plan_id, caller).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].id, s2);
    }

    #[test]
    fn test_revoke_is_not_idempotent() {
        let (store, alice, _) = setup();
        let caller = CallerIdentity::User(alice);
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let share_id = create_plan_share(&store, plan_id, "", caller).unwrap();

        revoke_plan_share(&store, share_id, caller).unwrap();
        // the second revoke can no longer see the share
        let result = revoke_plan_share(&store, share_id, caller);
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_update_remark() {
        let (store, alice, _) = setup();
        let caller = CallerIdentity::User(alice);
        let config_id = store
            .create_config(alice, ConfigKind::Global, "g", "{}", ConfigFormat::Json, "")
            .unwrap();
        let share_id = create_config_share(&store, config_id, "old", caller).unwrap();

        update_config_share(&store, share_id, "new", caller).unwrap();
        let share = store.get_config_share(share_id).unwrap().unwrap();
        assert_eq!(share.remark, "new");
    }
}
