use super::fake::{FakeGeolocator, FakeTokenStore};
use super::session::{Session, CURRENT_LOCATION_LABEL};
use super::token::{FileTokenStore, TokenStore};
use crate::api::fake::FakeApi;
use crate::api::models::UserProfile;
use std::sync::Arc;
use tempfile::TempDir;

fn file_store() -> (TempDir, FileTokenStore) {
    let dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(dir.path().to_str().unwrap());
    (dir, store)
}

async fn session_with(
    store: Arc<FakeTokenStore>,
    geolocator: Arc<FakeGeolocator>,
) -> Session {
    Session::init(store, geolocator).await.unwrap()
}

#[tokio::test]
async fn load_returns_none_when_no_token_persisted() {
    let (_dir, store) = file_store();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_then_load_round_trips_token() {
    let (_dir, store) = file_store();
    store.save("abc123").await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some("abc123".to_string()));
}

#[tokio::test]
async fn save_replaces_previous_token() {
    let (_dir, store) = file_store();
    store.save("first").await.unwrap();
    store.save("second").await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some("second".to_string()));
}

#[tokio::test]
async fn clear_is_idempotent() {
    let (_dir, store) = file_store();
    store.save("abc123").await.unwrap();
    store.clear().await.unwrap();
    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn whitespace_only_token_file_loads_as_none() {
    let (_dir, store) = file_store();
    tokio::fs::write(store.path(), "  \n").await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn init_derives_logged_from_persisted_token() {
    let store = Arc::new(FakeTokenStore::with_token("persisted"));
    let session = session_with(store, Arc::new(FakeGeolocator::new())).await;
    assert!(session.is_logged());
    assert_eq!(session.token(), Some("persisted".to_string()));

    let empty_store = Arc::new(FakeTokenStore::new());
    let session = session_with(empty_store, Arc::new(FakeGeolocator::new())).await;
    assert!(!session.is_logged());
}

#[tokio::test]
async fn login_persists_token_and_flips_logged() {
    let store = Arc::new(FakeTokenStore::new());
    let session = session_with(store.clone(), Arc::new(FakeGeolocator::new())).await;

    session.login("fresh-token").await.unwrap();

    assert!(session.is_logged());
    assert_eq!(store.stored(), Some("fresh-token".to_string()));
}

#[tokio::test]
async fn failed_token_persistence_leaves_the_session_logged_out() {
    let store = Arc::new(FakeTokenStore::new());
    store.fail_save();
    let session = session_with(store.clone(), Arc::new(FakeGeolocator::new())).await;

    let result = session.login("fresh-token").await;

    assert!(result.is_err());
    assert!(!session.is_logged());
    assert_eq!(session.token(), None);
    assert_eq!(store.stored(), None);
}

#[tokio::test]
async fn logout_clears_persisted_and_in_memory_state() {
    let store = Arc::new(FakeTokenStore::with_token("persisted"));
    let session = session_with(store.clone(), Arc::new(FakeGeolocator::new())).await;

    let api = FakeApi::new();
    api.set_valid_token("persisted");
    api.set_user(UserProfile {
        id: Some(1),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
    });
    session.refresh_user(&api).await;
    assert!(session.user().is_some());

    session.logout().await.unwrap();

    assert!(!session.is_logged());
    assert_eq!(session.token(), None);
    assert!(session.user().is_none());
    assert_eq!(store.stored(), None);
}

#[tokio::test]
async fn refresh_user_resolves_profile_when_logged() {
    let store = Arc::new(FakeTokenStore::with_token("persisted"));
    let session = session_with(store, Arc::new(FakeGeolocator::new())).await;

    let api = FakeApi::new();
    api.set_valid_token("persisted");
    api.set_user(UserProfile {
        id: Some(1),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
    });

    session.refresh_user(&api).await;

    assert_eq!(session.user().unwrap().email, "ana@example.com");
}

#[tokio::test]
async fn refresh_user_does_nothing_when_not_logged() {
    let store = Arc::new(FakeTokenStore::new());
    let session = session_with(store, Arc::new(FakeGeolocator::new())).await;

    let api = FakeApi::new();
    session.refresh_user(&api).await;

    assert!(session.user().is_none());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn rejected_credentials_drop_logged_flag_without_error() {
    let store = Arc::new(FakeTokenStore::with_token("stale"));
    let session = session_with(store, Arc::new(FakeGeolocator::new())).await;

    let api = FakeApi::new();
    api.set_valid_token("different");

    session.refresh_user(&api).await;

    assert!(!session.is_logged());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn failed_profile_fetch_leaves_user_unset_but_logged() {
    let store = Arc::new(FakeTokenStore::with_token("persisted"));
    let session = session_with(store, Arc::new(FakeGeolocator::new())).await;

    let api = FakeApi::new();
    api.set_valid_token("persisted");
    api.fail_operation("current_user");

    session.refresh_user(&api).await;

    assert!(session.is_logged());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn request_location_resolves_once_and_caches() {
    let geolocator = Arc::new(FakeGeolocator::with_position(4.6, -74.08));
    let store = Arc::new(FakeTokenStore::new());
    let session = session_with(store, geolocator.clone()).await;

    let first = session.request_location().await.unwrap();
    let second = session.request_location().await.unwrap();

    assert_eq!(first.name, CURRENT_LOCATION_LABEL);
    assert_eq!(first.latitude, 4.6);
    assert_eq!(first.longitude, -74.08);
    assert_eq!(first, second);
    assert_eq!(geolocator.call_count(), 1);
}

#[tokio::test]
async fn denied_geolocation_leaves_location_unset() {
    let geolocator = Arc::new(FakeGeolocator::new());
    geolocator.deny();
    let store = Arc::new(FakeTokenStore::new());
    let session = session_with(store, geolocator.clone()).await;

    assert!(session.request_location().await.is_none());
    assert!(session.location().is_none());

    // Failure is not cached
    assert!(session.request_location().await.is_none());
    assert_eq!(geolocator.call_count(), 2);
}
