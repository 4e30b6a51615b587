use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::CallerIdentity;

use super::ownership::{ResourceKind, verify_ownership};

/// What a plan membership edge points at: a config the caller owns, or
/// a live share of anybody's config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationTarget {
    Config(i64),
    ConfigShare(i64),
}

/// Attaches a config or config share to a plan. The caller must own the
/// plan; a direct config must also be owned by the caller, while a share
/// only has to exist and be live. A duplicate edge reports `Conflict`,
/// whether detected up front or by the primary key under a race.
pub fn add_relation(
    store: &dyn Store,
    plan_id: i64,
    target: RelationTarget,
    caller: CallerIdentity,
) -> Result<()> {
    verify_ownership(store, ResourceKind::Plan, plan_id, caller)?;

    match target {
        RelationTarget::Config(config_id) => {
            verify_ownership(store, ResourceKind::Config, config_id, caller)?;
            store.add_plan_config_relation(plan_id, config_id)
        }
        RelationTarget::ConfigShare(share_id) => {
            store.config_share_owner(share_id)?.ok_or(Error::NotFound)?;
            store.add_plan_share_relation(plan_id, share_id)
        }
    }
}

/// Detaches a config or config share from a plan. Only plan ownership is
/// required; the target may have been deleted or revoked since it was
/// attached. A missing edge reports `NotFound`.
pub fn remove_relation(
    store: &dyn Store,
    plan_id: i64,
    target: RelationTarget,
    caller: CallerIdentity,
) -> Result<()> {
    verify_ownership(store, ResourceKind::Plan, plan_id, caller)?;

    let removed = match target {
        RelationTarget::Config(config_id) => store.remove_plan_config_relation(plan_id, config_id)?,
        RelationTarget::ConfigShare(share_id) => {
            store.remove_plan_share_relation(plan_id, share_id)?
        }
    };

    if !removed {
        return Err(Error::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_direct_config_must_be_owned() {
        let (store, alice, bob) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let theirs = store
            .create_config(bob, ConfigKind::Lesson, "l", "{}", ConfigFormat::Json, "")
            .unwrap();

        let result = add_relation(
            &store,
            plan_id,
            RelationTarget::Config(theirs),
            CallerIdentity::User(alice),
        );
        assert!(matches!(result, Err(Error::Forbidden)));
    }

    #[test]
    fn test_share_relation_accepts_foreign_share() {
        let (store, alice, bob) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let theirs = store
            .create_config(bob, ConfigKind::Lesson, "l", "{}", ConfigFormat::Json, "")
            .unwrap();
        let share_id = store.create_config_share(theirs, "").unwrap();

        add_relation(
            &store,
            plan_id,
            RelationTarget::ConfigShare(share_id),
            CallerIdentity::User(alice),
        )
        .unwrap();
    }

    #[test]
    fn test_revoked_share_cannot_be_attached() {
        let (store, alice, bob) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let theirs = store
            .create_config(bob, ConfigKind::Lesson, "l", "{}", ConfigFormat::Json, "")
            .unwrap();
        let share_id = store.create_config_share(theirs, "").unwrap();
        store.soft_delete_config_share(share_id).unwrap();

        let result = add_relation(
            &store,
            plan_id,
            RelationTarget::ConfigShare(share_id),
            CallerIdentity::User(alice),
        );
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_duplicate_add_conflicts() {
        let (store, alice, _) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let config_id = store
            .create_config(alice, ConfigKind::Lesson, "l", "{}", ConfigFormat::Json, "")
            .unwrap();
        let caller = CallerIdentity::User(alice);

        add_relation(&store, plan_id, RelationTarget::Config(config_id), caller).unwrap();
        let result = add_relation(&store, plan_id, RelationTarget::Config(config_id), caller);
        assert!(matches!(result, Err(Error::Conflict)));
    }

    #[test]
    fn test_remove_missing_edge_not_found() {
        let (store, alice, _) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let caller = CallerIdentity::User(alice);

        let result = remove_relation(&store, plan_id, RelationTarget::Config(42), caller);
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_only_plan_owner_mutates_membership() {
        let (store, alice, bob) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let config_id = store
            .create_config(bob, ConfigKind::Lesson, "l", "{}", ConfigFormat::Json, "")
            .unwrap();

        let result = add_relation(
            &store,
            plan_id,
            RelationTarget::Config(config_id),
            CallerIdentity::User(bob),
        );
        assert!(matches!(result, Err(Error::Forbidden)));
    }
}
