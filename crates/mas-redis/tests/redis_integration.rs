//! Redis integration tests
//!
//! Note: these tests require a running Redis server.
//! Run with: docker run -d -p 6379:6379 redis:latest
//! then: cargo test -p mas-redis -- --ignored

use mas_domain::keys;
use mas_domain::types::{Buffer, RecordChanges, category};
use mas_domain::Credentials;
use mas_redis::maintenance::{delete_by_pattern, delete_hash};
use mas_redis::{RedisAuthState, RedisConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestCreds {
    registration_id: u32,
    noise_key: Buffer,
    identity_key: Buffer,
}

impl Credentials for TestCreds {
    fn init() -> Self {
        Self {
            registration_id: 0,
            noise_key: Buffer::new(vec![0u8; 32]),
            identity_key: Buffer::new(vec![0u8; 32]),
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}

fn namespace(test: &str) -> String {
    format!("mas-it-{test}-{}", std::process::id())
}

#[tokio::test]
#[ignore]
async fn flat_bundle_round_trip() {
    init_tracing();
    let config = RedisConfig::default();
    let ns = namespace("flat-bundle");

    let auth = RedisAuthState::<TestCreds>::open_flat(&config, &ns)
        .await
        .unwrap();
    auth.store().update_creds(|creds| {
        creds.registration_id = 1447;
        creds.noise_key = Buffer::new(vec![3u8; 32]);
    });
    auth.store().save_creds().await.unwrap();

    let reopened = RedisAuthState::<TestCreds>::open_flat(&config, &ns)
        .await
        .unwrap();
    assert_eq!(reopened.store().snapshot(), auth.store().snapshot());

    let mut conn = auth.connection();
    delete_by_pattern(&mut conn, &keys::flat_namespace_pattern(&ns))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn hashed_bundle_round_trip() {
    init_tracing();
    let config = RedisConfig::default();
    let ns = namespace("hashed-bundle");

    let auth = RedisAuthState::<TestCreds>::open_hashed(&config, &ns)
        .await
        .unwrap();
    auth.store()
        .update_creds(|creds| creds.registration_id = 7331);
    auth.store().save_creds().await.unwrap();

    let reopened = RedisAuthState::<TestCreds>::open_hashed(&config, &ns)
        .await
        .unwrap();
    assert_eq!(reopened.store().snapshot(), auth.store().snapshot());

    let mut conn = auth.connection();
    delete_hash(&mut conn, &ns).await;
}

#[tokio::test]
#[ignore]
async fn flat_record_lifecycle() {
    init_tracing();
    let config = RedisConfig::default();
    let ns = namespace("flat-records");

    let auth = RedisAuthState::<TestCreds>::open_flat(&config, &ns)
        .await
        .unwrap();
    let store = auth.store();

    let mut changes = RecordChanges::new();
    changes.set(category::PRE_KEY, "1", json!({"public": "abc"}));
    changes.set(category::PRE_KEY, "2", json!({"public": "def"}));
    store.set_keys(&changes).await.unwrap();

    let records = store
        .get_keys(
            category::PRE_KEY,
            &["1".to_string(), "2".to_string(), "3".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(!records.contains_key("3"));

    let mut deletion = RecordChanges::new();
    deletion.remove(category::PRE_KEY, "1");
    store.set_keys(&deletion).await.unwrap();

    let records = store
        .get_keys(category::PRE_KEY, &["1".to_string()])
        .await
        .unwrap();
    assert!(records.is_empty());

    let mut conn = auth.connection();
    delete_by_pattern(&mut conn, &keys::flat_namespace_pattern(&ns))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn hashed_record_lifecycle() {
    init_tracing();
    let config = RedisConfig::default();
    let ns = namespace("hashed-records");

    let auth = RedisAuthState::<TestCreds>::open_hashed(&config, &ns)
        .await
        .unwrap();
    let store = auth.store();

    let mut changes = RecordChanges::new();
    changes.set(
        category::SENDER_KEY,
        "group-7",
        json!({"seed": {"type": "Buffer", "data": [1, 2, 255]}}),
    );
    store.set_keys(&changes).await.unwrap();

    let records = store
        .get_keys(category::SENDER_KEY, &["group-7".to_string()])
        .await
        .unwrap();
    assert_eq!(
        records["group-7"],
        json!({"seed": {"type": "Buffer", "data": "AQL/"}})
    );

    let mut deletion = RecordChanges::new();
    deletion.remove(category::SENDER_KEY, "group-7");
    store.set_keys(&deletion).await.unwrap();
    let records = store
        .get_keys(category::SENDER_KEY, &["group-7".to_string()])
        .await
        .unwrap();
    assert!(records.is_empty());

    let mut conn = auth.connection();
    delete_hash(&mut conn, &ns).await;
}

#[tokio::test]
#[ignore]
async fn pattern_delete_is_scoped_and_idempotent() {
    init_tracing();
    let config = RedisConfig::default();
    let ns_a = namespace("sweep-a");
    let ns_b = namespace("sweep-b");

    let auth_a = RedisAuthState::<TestCreds>::open_flat(&config, &ns_a)
        .await
        .unwrap();
    auth_a.store().update_creds(|c| c.registration_id = 1);
    auth_a.store().save_creds().await.unwrap();

    let auth_b = RedisAuthState::<TestCreds>::open_flat(&config, &ns_b)
        .await
        .unwrap();
    auth_b.store().update_creds(|c| c.registration_id = 2);
    auth_b.store().save_creds().await.unwrap();

    let mut conn = auth_a.connection();
    delete_by_pattern(&mut conn, &keys::flat_namespace_pattern(&ns_a))
        .await
        .unwrap();

    // namespace A is gone, namespace B is untouched
    let reopened_a = RedisAuthState::<TestCreds>::open_flat(&config, &ns_a)
        .await
        .unwrap();
    assert_eq!(reopened_a.store().with_creds(|c| c.registration_id), 0);
    let reopened_b = RedisAuthState::<TestCreds>::open_flat(&config, &ns_b)
        .await
        .unwrap();
    assert_eq!(reopened_b.store().with_creds(|c| c.registration_id), 2);

    // nothing left to match: still no error
    delete_by_pattern(&mut conn, &keys::flat_namespace_pattern(&ns_a))
        .await
        .unwrap();

    delete_by_pattern(&mut conn, &keys::flat_namespace_pattern(&ns_b))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn delete_hash_on_missing_namespace_is_silent() {
    init_tracing();
    let config = RedisConfig::default();
    let ns = namespace("never-written");

    let auth = RedisAuthState::<TestCreds>::open_hashed(&config, &ns)
        .await
        .unwrap();
    let mut conn = auth.connection();
    // namespace was never saved; both calls complete without error
    delete_hash(&mut conn, &ns).await;
    delete_hash(&mut conn, &ns).await;
}

#[tokio::test]
#[ignore]
async fn layouts_do_not_interfere() {
    init_tracing();
    let config = RedisConfig::default();
    let ns = namespace("layouts");

    let flat = RedisAuthState::<TestCreds>::open_flat(&config, &ns)
        .await
        .unwrap();
    flat.store().update_creds(|c| c.registration_id = 11);
    flat.store().save_creds().await.unwrap();

    let hashed = RedisAuthState::<TestCreds>::open_hashed(&config, &ns)
        .await
        .unwrap();
    // the flat bundle is invisible to the hashed layout
    assert_eq!(hashed.store().with_creds(|c| c.registration_id), 0);
    hashed.store().update_creds(|c| c.registration_id = 22);
    hashed.store().save_creds().await.unwrap();

    // sweeping the flat namespace leaves the hashed state alone
    let mut conn = flat.connection();
    delete_by_pattern(&mut conn, &keys::flat_namespace_pattern(&ns))
        .await
        .unwrap();
    let hashed_again = RedisAuthState::<TestCreds>::open_hashed(&config, &ns)
        .await
        .unwrap();
    assert_eq!(hashed_again.store().with_creds(|c| c.registration_id), 22);

    // and deleting the hash leaves nothing behind for either layout
    delete_hash(&mut conn, &ns).await;
    let flat_again = RedisAuthState::<TestCreds>::open_flat(&config, &ns)
        .await
        .unwrap();
    assert_eq!(flat_again.store().with_creds(|c| c.registration_id), 0);
}
