use chrono::{Duration, Utc};

use crate::auth::generate_token;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{CallerIdentity, PlanToken};

use super::ownership::{ResourceKind, verify_ownership};

/// At most this many access tokens may exist per plan at once.
pub const PLAN_TOKEN_CAP: i64 = 30;

/// Default session lifetime. Expired rows are swept in the background,
/// but resolution treats them as anonymous even before the sweep runs.
pub const SESSION_TTL_HOURS: i64 = 72;

/// Issues a fresh session token for a user, superseding any earlier one.
pub fn issue_session(store: &dyn Store, user_id: i64, duration_hours: i64) -> Result<String> {
    let token = generate_token();
    let expires_at = Utc::now() + Duration::hours(duration_hours);
    store.replace_login_token(user_id, &token, expires_at)?;
    Ok(token)
}

/// Maps a session token to a caller. Unknown and expired tokens are
/// `Anonymous`, never an error.
pub fn resolve_session(store: &dyn Store, token: &str) -> Result<CallerIdentity> {
    match store.get_login_token(token)? {
        Some(t) if t.expires_at > Utc::now() => Ok(CallerIdentity::User(t.user_id)),
        _ => Ok(CallerIdentity::Anonymous),
    }
}

/// Revokes a session token. Idempotent: revoking an unknown token is fine.
pub fn revoke_session(store: &dyn Store, token: &str) -> Result<()> {
    store.delete_login_token(token)
}

/// Issues a plan access token. Requires plan ownership; refuses with
/// `LimitExceeded` once the plan carries the full cap of tokens.
pub fn issue_plan_token(store: &dyn Store, plan_id: i64, caller: CallerIdentity) -> Result<String> {
    verify_ownership(store, ResourceKind::Plan, plan_id, caller)?;

    let token = generate_token();
    store.create_plan_token(plan_id, &token, PLAN_TOKEN_CAP)?;
    Ok(token)
}

/// Revokes a plan access token. The token is looked up first so ownership
/// is checked against the plan it belongs to.
pub fn revoke_plan_token(store: &dyn Store, token: &str, caller: CallerIdentity) -> Result<()> {
    let plan_token = store.get_plan_token(token)?.ok_or(Error::NotFound)?;
    verify_ownership(store, ResourceKind::Plan, plan_token.plan_id, caller)?;

    if !store.delete_plan_token(token)? {
        return Err(Error::NotFound);
    }
    Ok(())
}

/// Resolves a plan token to its live plan; anonymous callers use this on
/// the generation path.
pub fn resolve_plan_token(store: &dyn Store, token: &str) -> Result<i64> {
    store.resolve_plan_token(token)?.ok_or(Error::NotFound)
}

pub fn list_plan_tokens(
    store: &dyn Store,
    plan_id: i64,
    caller: CallerIdentity,
) -> Result<Vec<PlanToken>> {
    verify_ownership(store, ResourceKind::Plan, plan_id, caller)?;
    store.list_plan_tokens(plan_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

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
    fn test_session_roundtrip() {
        let (store, alice, _) = setup();

        let token = issue_session(&store, alice, SESSION_TTL_HOURS).unwrap();
        assert_eq!(token.len(), 32);
        assert_eq!(
            resolve_session(&store, &token).unwrap(),
            CallerIdentity::User(alice)
        );

        revoke_session(&store, &token).unwrap();
        assert_eq!(
            resolve_session(&store, &token).unwrap(),
            CallerIdentity::Anonymous
        );
        // revoking again is a no-op
        revoke_session(&store, &token).unwrap();
    }

    #[test]
    fn test_new_session_supersedes_old() {
        let (store, alice, _) = setup();

        let first = issue_session(&store, alice, SESSION_TTL_HOURS).unwrap();
        let second = issue_session(&store, alice, SESSION_TTL_HOURS).unwrap();

        assert_eq!(
            resolve_session(&store, &first).unwrap(),
            CallerIdentity::Anonymous
        );
        assert_eq!(
            resolve_session(&store, &second).unwrap(),
            CallerIdentity::User(alice)
        );
    }

    #[test]
    fn test_expired_session_is_anonymous_before_sweep() {
        let (store, alice, _) = setup();
        let expired = Utc::now() - Duration::hours(1);
        store.replace_login_token(alice, "stale", expired).unwrap();

        assert_eq!(
            resolve_session(&store, "stale").unwrap(),
            CallerIdentity::Anonymous
        );
    }

    #[test]
    fn test_plan_token_cap_blocks_then_revoke_frees() {
        let (store, alice, _) = setup();
        let caller = CallerIdentity::User(alice);
        let plan_id = store.create_plan(alice, "p", "").unwrap();

        let mut tokens = Vec::new();
        for _ in 0..PLAN_TOKEN_CAP {
            tokens.push(issue_plan_token(&store, plan_id, caller).unwrap());
        }

        let result = issue_plan_token(&store, plan_id, caller);
        assert!(matches!(result, Err(Error::LimitExceeded)));

        revoke_plan_token(&store, &tokens[0], caller).unwrap();
        issue_plan_token(&store, plan_id, caller).unwrap();
    }

    #[test]
    fn test_only_owner_issues_and_revokes() {
        let (store, alice, bob) = setup();
        let plan_id = store.create_plan(alice, "p", "").unwrap();

        let result = issue_plan_token(&store, plan_id, CallerIdentity::User(bob));
        assert!(matches!(result, Err(Error::Forbidden)));

        let token = issue_plan_token(&store, plan_id, CallerIdentity::User(alice)).unwrap();
        let result = revoke_plan_token(&store, &token, CallerIdentity::User(bob));
        assert!(matches!(result, Err(Error::Forbidden)));
    }

    #[test]
    fn test_resolve_plan_token_dead_plan_not_found() {
        let (store, alice, _) = setup();
        let caller = CallerIdentity::User(alice);
        let plan_id = store.create_plan(alice, "p", "").unwrap();
        let token = issue_plan_token(&store, plan_id, caller).unwrap();

        assert_eq!(resolve_plan_token(&store, &token).unwrap(), plan_id);

        store.soft_delete_plan(plan_id).unwrap();
        let result = resolve_plan_token(&store, &token);
        assert!(matches!(result, Err(Error::NotFound)));
    }
}
