use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::CallerIdentity;

/// The ownable resource kinds. Shares have no owner column; their owner
/// is the owner of the resource they point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Config,
    Plan,
    ConfigShare,
    PlanShare,
}

/// Checks that `caller` owns the live resource `(kind, id)`.
///
/// Absent and soft-deleted resources are indistinguishable to the caller:
/// both come back `NotFound`, so probing for other users' deleted rows
/// reveals nothing. `Forbidden` is reserved for a live resource owned by
/// somebody else. Runs against the store on every call; ownership results
/// are never cached across requests.
pub fn verify_ownership(
    store: &dyn Store,
    kind: ResourceKind,
    id: i64,
    caller: CallerIdentity,
) -> Result<()> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;

    let owner = match kind {
        ResourceKind::Config => store.config_owner(id)?,
        ResourceKind::Plan => store.plan_owner(id)?,
        ResourceKind::ConfigShare => store.config_share_owner(id)?,
        ResourceKind::PlanShare => store.plan_share_owner(id)?,
    }
    .ok_or(Error::NotFound)?;

    if owner != user_id {
        return Err(Error::Forbidden);
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
    fn test_owner_passes_stranger_forbidden() {
        let (store, alice, bob) = setup();
        let config_id = store
            .create_config(alice, ConfigKind::Global, "g", "{}", ConfigFormat::Json, "")
            .unwrap();

        verify_ownership(
            &store,
            ResourceKind::Config,
            config_id,
            CallerIdentity::User(alice),
        )
        .unwrap();

        let result = verify_ownership(
            &store,
            ResourceKind::Config,
            config_id,
            CallerIdentity::User(bob),
        );
        assert!(matches!(result, Err(Error::Forbidden)));
    }

    #[test]
    fn test_anonymous_is_unauthenticated() {
        let (store, alice, _) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();

        let result = verify_ownership(
            &store,
            ResourceKind::Plan,
            plan_id,
            CallerIdentity::Anonymous,
        );
        assert!(matches!(result, Err(Error::Unauthenticated)));
    }

    #[test]
    fn test_deleted_and_absent_both_not_found() {
        let (store, alice, _) = setup();
        let config_id = store
            .create_config(alice, ConfigKind::Global, "g", "{}", ConfigFormat::Json, "")
            .unwrap();
        store.soft_delete_config(config_id).unwrap();

        let deleted = verify_ownership(
            &store,
            ResourceKind::Config,
            config_id,
            CallerIdentity::User(alice),
        );
        let absent = verify_ownership(
            &store,
            ResourceKind::Config,
            9999,
            CallerIdentity::User(alice),
        );
        assert!(matches!(deleted, Err(Error::NotFound)));
        assert!(matches!(absent, Err(Error::NotFound)));
    }

    #[test]
    fn test_share_ownership_derives_from_resource() {
        let (store, alice, bob) = setup();
        let config_id = store
            .create_config(alice, ConfigKind::Lesson, "l", "{}", ConfigFormat::Json, "")
            .unwrap();
        let share_id = store.create_config_share(config_id, "").unwrap();

        verify_ownership(
            &store,
            ResourceKind::ConfigShare,
            share_id,
            CallerIdentity::User(alice),
        )
        .unwrap();

        let result = verify_ownership(
            &store,
            ResourceKind::ConfigShare,
            share_id,
            CallerIdentity::User(bob),
        );
        assert!(matches!(result, Err(Error::Forbidden)));

        // deleting the underlying config kills the share's ownership chain
        store.soft_delete_config(config_id).unwrap();
        let result = verify_ownership(
            &store,
            ResourceKind::ConfigShare,
            share_id,
            CallerIdentity::User(alice),
        );
        assert!(matches!(result, Err(Error::NotFound)));
    }
}
