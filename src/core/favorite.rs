use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{CallerIdentity, FavoriteConfigSummary, FavoritePlanSummary};

use super::clamp_page;

/// Bookmarks a live config share. The share itself must be reachable
/// (share and config both live); a duplicate bookmark is `Conflict`.
pub fn add_favorite_config(
    store: &dyn Store,
    share_id: i64,
    caller: CallerIdentity,
) -> Result<()> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;
    store.config_share_owner(share_id)?.ok_or(Error::NotFound)?;
    store.add_favorite_config(user_id, share_id)
}

pub fn remove_favorite_config(
    store: &dyn Store,
    share_id: i64,
    caller: CallerIdentity,
) -> Result<()> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;
    if !store.remove_favorite_config(user_id, share_id)? {
        return Err(Error::NotFound);
    }
    Ok(())
}

/// Lists the caller's config bookmarks joined through to the live
/// resource. Revoked shares and deleted configs drop out silently while
/// the favorite row stays behind.
pub fn list_favorite_configs(
    store: &dyn Store,
    caller: CallerIdentity,
    offset: i64,
    count: i64,
) -> Result<Vec<FavoriteConfigSummary>> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;
    let (offset, count) = clamp_page(offset, count);
    store.list_favorite_configs(user_id, offset, count)
}

pub fn add_favorite_plan(store: &dyn Store, share_id: i64, caller: CallerIdentity) -> Result<()> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;
    store.plan_share_owner(share_id)?.ok_or(Error::NotFound)?;
    store.add_favorite_plan(user_id, share_id)
}

pub fn remove_favorite_plan(
    store: &dyn Store,
    share_id: i64,
    caller: CallerIdentity,
) -> Result<()> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;
    if !store.remove_favorite_plan(user_id, share_id)? {
        return Err(Error::NotFound);
    }
    Ok(())
}

pub fn list_favorite_plans(
    store: &dyn Store,
    caller: CallerIdentity,
    offset: i64,
    count: i64,
) -> Result<Vec<FavoritePlanSummary>> {
    let user_id = caller.user_id().ok_or(Error::Unauthenticated)?;
    let (offset, count) = clamp_page(offset, count);
    store.list_favorite_plans(user_id, offset, count)
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
    fn test_favorite_requires_live_share() {
        let (store, alice, bob) = setup();
        let config_id = store
            .create_config(alice, ConfigKind::Global, "g", "{}", ConfigFormat::Json, "")
            .unwrap();
        let share_id = store.create_config_share(config_id, "").unwrap();
        store.soft_delete_config_share(share_id).unwrap();

        let result = add_favorite_config(&store, share_id, CallerIdentity::User(bob));
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_duplicate_favorite_conflicts() {
        let (store, alice, bob) = setup();
        let config_id = store
            .create_config(alice, ConfigKind::Global, "g", "{}", ConfigFormat::Json, "")
            .unwrap();
        let share_id = store.create_config_share(config_id, "").unwrap();
        let caller = CallerIdentity::User(bob);

        add_favorite_config(&store, share_id, caller).unwrap();
        let result = add_favorite_config(&store, share_id, caller);
        assert!(matches!(result, Err(Error::Conflict)));
    }

    #[test]
    fn test_remove_missing_favorite_not_found() {
        let (store, _, bob) = setup();
        let result = remove_favorite_plan(&store, 42, CallerIdentity::User(bob));
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_anonymous_cannot_favorite() {
        let (store, alice, _) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let share_id = store.create_plan_share(plan_id, "").unwrap();

        let result = add_favorite_plan(&store, share_id, CallerIdentity::Anonymous);
        assert!(matches!(result, Err(Error::Unauthenticated)));
    }

    #[test]
    fn test_listing_hides_dead_resource_keeps_row() {
        let (store, alice, bob) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let share_id = store.create_plan_share(plan_id, "").unwrap();
        let caller = CallerIdentity::User(bob);

        add_favorite_plan(&store, share_id, caller).unwrap();
        assert_eq!(list_favorite_plans(&store, caller, 0, 30).unwrap().len(), 1);

        store.soft_delete_plan(plan_id).unwrap();
        assert!(list_favorite_plans(&store, caller, 0, 30).unwrap().is_empty());

        // the bookmark row itself survives and can still be removed
        remove_favorite_plan(&store, share_id, caller).unwrap();
    }
}
