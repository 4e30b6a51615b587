//! End-to-end flows through the library: two users sharing config
//! fragments, assembling plans, and driving the token lifecycle against
//! an on-disk database.

use tempfile::TempDir;

use calplan::auth::PasswordHasher;
use calplan::core::assemble::{assemble, assemble_by_share, assemble_by_token};
use calplan::core::favorite;
use calplan::core::relation::{RelationTarget, add_relation, remove_relation};
use calplan::core::share;
use calplan::core::token::{
    SESSION_TTL_HOURS, issue_plan_token, issue_session, resolve_plan_token, resolve_session,
    revoke_plan_token, revoke_session,
};
use calplan::error::Error;
use calplan::store::{SqliteStore, Store};
use calplan::types::{CallerIdentity, ConfigFormat, ConfigKind};

fn open_store(dir: &TempDir) -> SqliteStore {
    let store = SqliteStore::new(dir.path().join("calplan.db")).unwrap();
    store.initialize().unwrap();
    store
}

#[test]
fn test_account_and_session_flow() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let hasher = PasswordHasher::new();

    let hash = hasher.hash("hunter2").unwrap();
    let alice = store
        .create_user("alice", "alice@example.com", &hash, "Alice")
        .unwrap();

    // login: look up, verify, issue
    let user = store.get_user_by_username("alice").unwrap().unwrap();
    assert!(hasher.verify("hunter2", &user.password_hash).unwrap());
    assert!(!hasher.verify("wrong", &user.password_hash).unwrap());

    let token = issue_session(&store, alice, SESSION_TTL_HOURS).unwrap();
    assert_eq!(
        resolve_session(&store, &token).unwrap(),
        CallerIdentity::User(alice)
    );

    // a second login kills the first session
    let token2 = issue_session(&store, alice, SESSION_TTL_HOURS).unwrap();
    assert_eq!(
        resolve_session(&store, &token).unwrap(),
        CallerIdentity::Anonymous
    );

    revoke_session(&store, &token2).unwrap();
    assert_eq!(
        resolve_session(&store, &token2).unwrap(),
        CallerIdentity::Anonymous
    );
}

#[test]
fn test_sharing_and_assembly_flow() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let alice = store
        .create_user("alice", "alice@example.com", "h", "Alice")
        .unwrap();
    let bob = store
        .create_user("bob", "bob@example.com", "h", "Bob")
        .unwrap();
    let as_alice = CallerIdentity::User(alice);
    let as_bob = CallerIdentity::User(bob);

    // Bob publishes a lesson config; Alice builds a plan around it.
    let bobs_config = store
        .create_config(
            bob,
            ConfigKind::Lesson,
            "physics",
            r#"{"name":"physics"}"#,
            ConfigFormat::Json,
            "",
        )
        .unwrap();
    let bobs_share = share::create_config_share(&store, bobs_config, "term 1", as_bob).unwrap();

    let plan = store.create_plan(alice, "semester", "").unwrap();
    let global = store
        .create_config(
            alice,
            ConfigKind::Global,
            "defaults",
            r#"{"tz":"UTC"}"#,
            ConfigFormat::Json,
            "",
        )
        .unwrap();
    let own_lesson = store
        .create_config(
            alice,
            ConfigKind::Lesson,
            "math",
            r#"{"name":"math"}"#,
            ConfigFormat::Json,
            "",
        )
        .unwrap();

    add_relation(&store, plan, RelationTarget::Config(global), as_alice).unwrap();
    add_relation(&store, plan, RelationTarget::Config(own_lesson), as_alice).unwrap();
    add_relation(
        &store,
        plan,
        RelationTarget::ConfigShare(bobs_share),
        as_alice,
    )
    .unwrap();

    let doc = assemble(&store, plan).unwrap();
    assert_eq!(
        doc.to_json().unwrap(),
        r#"{"global":{"tz":"UTC"},"lessons":[{"name":"math"},{"name":"physics"}]}"#
    );

    // Bob revokes his share; it falls out of the merge, the edge stays.
    share::revoke_config_share(&store, bobs_share, as_bob).unwrap();
    let doc = assemble(&store, plan).unwrap();
    assert_eq!(doc.lessons.len(), 1);

    // Alice can still drop the stale edge.
    remove_relation(
        &store,
        plan,
        RelationTarget::ConfigShare(bobs_share),
        as_alice,
    )
    .unwrap();
}

#[test]
fn test_plan_token_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let alice = store
        .create_user("alice", "alice@example.com", "h", "Alice")
        .unwrap();
    let as_alice = CallerIdentity::User(alice);

    let plan = store.create_plan(alice, "semester", "").unwrap();
    let config = store
        .create_config(
            alice,
            ConfigKind::Global,
            "defaults",
            r#"{"tz":"UTC"}"#,
            ConfigFormat::Json,
            "",
        )
        .unwrap();
    add_relation(&store, plan, RelationTarget::Config(config), as_alice).unwrap();

    // the anonymous generation path needs nothing but the token
    let token = issue_plan_token(&store, plan, as_alice).unwrap();
    assert_eq!(resolve_plan_token(&store, &token).unwrap(), plan);
    let doc = assemble_by_token(&store, &token).unwrap();
    assert_eq!(
        doc.to_json().unwrap(),
        r#"{"global":{"tz":"UTC"},"lessons":[]}"#
    );

    revoke_plan_token(&store, &token, as_alice).unwrap();
    assert!(matches!(
        assemble_by_token(&store, &token),
        Err(Error::NotFound)
    ));

    // share links survive token revocation independently
    let share_id = share::create_plan_share(&store, plan, "public", as_alice).unwrap();
    assemble_by_share(&store, share_id).unwrap();

    share::revoke_plan_share(&store, share_id, as_alice).unwrap();
    assert!(matches!(
        assemble_by_share(&store, share_id),
        Err(Error::NotFound)
    ));
}

#[test]
fn test_favorites_follow_share_liveness() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let alice = store
        .create_user("alice", "alice@example.com", "h", "Alice")
        .unwrap();
    let bob = store
        .create_user("bob", "bob@example.com", "h", "Bob")
        .unwrap();
    let as_alice = CallerIdentity::User(alice);
    let as_bob = CallerIdentity::User(bob);

    let plan = store.create_plan(alice, "semester", "").unwrap();
    let share_id = share::create_plan_share(&store, plan, "", as_alice).unwrap();

    favorite::add_favorite_plan(&store, share_id, as_bob).unwrap();
    assert!(matches!(
        favorite::add_favorite_plan(&store, share_id, as_bob),
        Err(Error::Conflict)
    ));

    let list = favorite::list_favorite_plans(&store, as_bob, 0, 30).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].share_id, share_id);
    assert_eq!(list[0].name, "semester");

    // deleting the plan hides the favorite without touching the row
    store.soft_delete_plan(plan).unwrap();
    assert!(
        favorite::list_favorite_plans(&store, as_bob, 0, 30)
            .unwrap()
            .is_empty()
    );
    favorite::remove_favorite_plan(&store, share_id, as_bob).unwrap();
}

#[test]
fn test_soft_delete_hides_everywhere() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let alice = store
        .create_user("alice", "alice@example.com", "h", "Alice")
        .unwrap();
    let as_alice = CallerIdentity::User(alice);

    let plan = store.create_plan(alice, "semester", "").unwrap();
    let token = issue_plan_token(&store, plan, as_alice).unwrap();
    let share_id = share::create_plan_share(&store, plan, "", as_alice).unwrap();

    store.soft_delete_plan(plan).unwrap();

    assert!(matches!(assemble(&store, plan), Err(Error::NotFound)));
    assert!(matches!(
        resolve_plan_token(&store, &token),
        Err(Error::NotFound)
    ));
    assert!(matches!(
        assemble_by_share(&store, share_id),
        Err(Error::NotFound)
    ));
    // owner-facing mutation sees the same NotFound as a stranger would
    assert!(matches!(
        issue_plan_token(&store, plan, as_alice),
        Err(Error::NotFound)
    ));
}
