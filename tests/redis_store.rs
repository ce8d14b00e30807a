//! Redis code store integration tests
//!
//! Run against a real Redis; see `common::database` for setup.

#![cfg(feature = "ssr")]

mod common;

use std::time::Duration;

use common::{create_test_cache, unique_email};
use sns_backend::backend::codes::policy::{
    clear_verification, code_key, code_matches, issue_verification_code, reserve_resend,
    resend_count, resend_count_key, MAX_RESENDS,
};
use sns_backend::backend::codes::CodeStore;

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_set_get_del() {
    let store = create_test_cache().await;
    let key = unique_email("kv");

    store.set(&key, "1234", Duration::from_secs(60)).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("1234"));

    store.del(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_value_expires() {
    let store = create_test_cache().await;
    let key = unique_email("ttl");

    store.set(&key, "1234", Duration::from_secs(1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_verification_round_trip() {
    let store = create_test_cache().await;
    let email = unique_email("verify");

    let code = issue_verification_code(&store, &email).await.unwrap();
    assert!(code_matches(&store, &email, &code).await.unwrap());

    reserve_resend(&store, &email).await.unwrap();
    clear_verification(&store, &email).await.unwrap();

    assert_eq!(store.get(&code_key(&email)).await.unwrap(), None);
    assert_eq!(store.get(&resend_count_key(&email)).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_resend_counter_caps() {
    let store = create_test_cache().await;
    let email = unique_email("resend");

    for expected in 1..=MAX_RESENDS {
        assert_eq!(reserve_resend(&store, &email).await.unwrap(), Some(expected));
    }

    assert_eq!(resend_count(&store, &email).await.unwrap(), MAX_RESENDS);
    assert_eq!(reserve_resend(&store, &email).await.unwrap(), None);

    store.del(&resend_count_key(&email)).await.unwrap();
}
