//! Contract tests for forced single-host updates
//!
//! The forced path is what an administration surface calls after creating
//! or repairing a host: it must work before the first scheduled cycle has
//! ever discovered an IP, and must not touch anything for unknown hosts.

mod common;

use std::sync::Arc;

use common::*;
use dyndns_core::UpdateController;
use dyndns_core::ports::{HostAdmin, HostsRepository, IpStateStore};
use dyndns_core::store::MemoryStore;

#[tokio::test]
async fn unknown_host_fails_without_side_effects() {
    let store = MemoryStore::new();
    let provider = Arc::new(StaticIpProvider::new(addr("203.0.113.5")));
    let updater = Arc::new(RecordingUpdater::new());
    let ctrl = UpdateController::new(
        provider.clone(),
        updater.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    let outcome = ctrl.force_update_host("ghost.example.com").await.unwrap();

    assert!(!outcome.success);
    assert!(
        outcome
            .message
            .as_deref()
            .unwrap()
            .contains("not configured")
    );
    assert_eq!(updater.call_count(), 0);
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.get_state().await.unwrap().last_check, None);
}

#[tokio::test]
async fn missing_stored_ip_triggers_discovery_first() {
    let store = MemoryStore::new();
    store.add_host(host("a.example.com")).await.unwrap();

    let ip = addr("203.0.113.5");
    let provider = Arc::new(StaticIpProvider::new(ip));
    let updater = Arc::new(RecordingUpdater::new());
    let ctrl = UpdateController::new(
        provider.clone(),
        updater.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    let outcome = ctrl.force_update_host("a.example.com").await.unwrap();

    assert!(outcome.success);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(updater.calls(), vec![("a.example.com".to_string(), ip)]);
    // discovery result is persisted along with the check time
    let state = store.get_state().await.unwrap();
    assert_eq!(state.current_ip, Some(ip));
    assert!(state.last_check.is_some());

    let updated = store
        .get_host_by_hostname("a.example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.last_status, Some(true));
}

#[tokio::test]
async fn stored_ip_is_used_without_rediscovery() {
    let store = MemoryStore::new();
    store.add_host(host("a.example.com")).await.unwrap();

    let stored_ip = addr("203.0.113.5");
    store.set_ip(stored_ip).await.unwrap();

    // provider would answer something else; it must not be consulted
    let provider = Arc::new(StaticIpProvider::new(addr("198.51.100.7")));
    let updater = Arc::new(RecordingUpdater::new());
    let ctrl = UpdateController::new(
        provider.clone(),
        updater.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    let outcome = ctrl.force_update_host("a.example.com").await.unwrap();

    assert!(outcome.success);
    assert_eq!(provider.call_count(), 0);
    assert_eq!(
        updater.calls(),
        vec![("a.example.com".to_string(), stored_ip)]
    );
    assert_eq!(store.get_ip().await.unwrap(), Some(stored_ip));
}

#[tokio::test]
async fn forced_failure_is_persisted_on_the_host() {
    let store = MemoryStore::new();
    store.add_host(host("a.example.com")).await.unwrap();
    store.set_ip(addr("203.0.113.5")).await.unwrap();

    let updater = Arc::new(RecordingUpdater::new());
    updater.fail_host("a.example.com", "Authentication failed for host");

    let ctrl = UpdateController::new(
        Arc::new(StaticIpProvider::new(addr("203.0.113.5"))),
        updater.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    let outcome = ctrl.force_update_host("a.example.com").await.unwrap();

    assert!(!outcome.success);
    let failed = store
        .get_host_by_hostname("a.example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.last_status, Some(false));
    assert_eq!(
        failed.last_error.as_deref(),
        Some("Authentication failed for host")
    );
}
