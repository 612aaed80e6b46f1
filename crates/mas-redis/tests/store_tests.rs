//! Auth-store engine tests
//!
//! Run against the in-memory scheme, so no server is needed; the Redis
//! layouts are covered by the ignored integration suite.

use mas_domain::types::{Buffer, RecordChanges, category};
use mas_domain::{Credentials, KeyScheme};
use mas_redis::{AuthStore, InMemoryScheme};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

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

fn scheme() -> Arc<InMemoryScheme> {
    Arc::new(InMemoryScheme::new())
}

#[tokio::test]
async fn open_on_empty_store_initializes_fresh_creds() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();
    assert_eq!(store.snapshot(), TestCreds::init());
    assert_eq!(store.scheme_name(), "memory");
}

#[tokio::test]
async fn saved_creds_survive_reopen() {
    let scheme = scheme();

    let store = AuthStore::<TestCreds>::open(scheme.clone()).await.unwrap();
    store.update_creds(|creds| {
        creds.registration_id = 1447;
        creds.noise_key = Buffer::new(vec![9u8; 32]);
    });
    store.save_creds().await.unwrap();

    let reopened = AuthStore::<TestCreds>::open(scheme).await.unwrap();
    assert_eq!(reopened.snapshot(), store.snapshot());
}

#[tokio::test]
async fn unsaved_mutations_do_not_persist() {
    let scheme = scheme();

    let store = AuthStore::<TestCreds>::open(scheme.clone()).await.unwrap();
    store.update_creds(|creds| creds.registration_id = 99);

    let reopened = AuthStore::<TestCreds>::open(scheme).await.unwrap();
    assert_eq!(reopened.with_creds(|c| c.registration_id), 0);
}

#[tokio::test]
async fn corrupted_bundle_propagates_instead_of_resetting() {
    let scheme = scheme();
    scheme.seed_bundle("not json at all");
    assert!(AuthStore::<TestCreds>::open(scheme).await.is_err());
}

#[tokio::test]
async fn set_then_get_returns_the_stored_record() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();

    let mut changes = RecordChanges::new();
    changes.set(category::PRE_KEY, "1", json!({"public": "abc"}));
    store.set_keys(&changes).await.unwrap();

    let records = store
        .get_keys(category::PRE_KEY, &["1".to_string()])
        .await
        .unwrap();
    assert_eq!(records.get("1"), Some(&json!({"public": "abc"})));
}

#[tokio::test]
async fn removal_deletes_the_record() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();

    let mut changes = RecordChanges::new();
    changes.set(category::PRE_KEY, "1", json!("v"));
    store.set_keys(&changes).await.unwrap();

    let mut deletion = RecordChanges::new();
    deletion.remove(category::PRE_KEY, "1");
    store.set_keys(&deletion).await.unwrap();

    let records = store
        .get_keys(category::PRE_KEY, &["1".to_string()])
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn absent_ids_are_omitted_not_null() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();

    let mut changes = RecordChanges::new();
    changes.set(category::SESSION, "present", json!(1));
    store.set_keys(&changes).await.unwrap();

    let records = store
        .get_keys(
            category::SESSION,
            &["present".to_string(), "missing".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.contains_key("present"));
    assert!(!records.contains_key("missing"));
}

#[tokio::test]
async fn never_written_id_yields_empty_map() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();
    let records = store
        .get_keys(category::PRE_KEY, &["missing-id".to_string()])
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn empty_id_list_short_circuits() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();
    let records = store.get_keys(category::PRE_KEY, &[]).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn empty_change_set_is_a_noop() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();
    store.set_keys(&RecordChanges::new()).await.unwrap();
}

#[tokio::test]
async fn record_values_pass_through_the_binary_codec() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();

    // legacy array form goes in, canonical base64 form comes out
    let mut changes = RecordChanges::new();
    changes.set(
        category::SENDER_KEY,
        "g1",
        json!({"seed": {"type": "Buffer", "data": [1, 2, 255]}}),
    );
    store.set_keys(&changes).await.unwrap();

    let records = store
        .get_keys(category::SENDER_KEY, &["g1".to_string()])
        .await
        .unwrap();
    assert_eq!(
        records["g1"],
        json!({"seed": {"type": "Buffer", "data": "AQL/"}})
    );
}

#[tokio::test]
async fn categories_do_not_leak_into_each_other() {
    let store = AuthStore::<TestCreds>::open(scheme()).await.unwrap();

    let mut changes = RecordChanges::new();
    changes.set(category::PRE_KEY, "1", json!("prekey"));
    store.set_keys(&changes).await.unwrap();

    let records = store
        .get_keys(category::SESSION, &["1".to_string()])
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn scheme_sees_encoded_payloads_only() {
    let scheme = scheme();
    let store = AuthStore::<TestCreds>::open(scheme.clone()).await.unwrap();

    let mut changes = RecordChanges::new();
    changes.set(category::PRE_KEY, "1", json!({"n": 7}));
    store.set_keys(&changes).await.unwrap();

    let raw = scheme
        .read_records(category::PRE_KEY, &["1".to_string()])
        .await
        .unwrap();
    let payload = raw[0].as_ref().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(payload).unwrap()["n"], 7);
}
