use super::detail::{DetailState, EventDetail};
use super::listing::{EventListing, ListingFilters, LoadState};
use crate::api::fake::FakeApi;
use crate::api::models::Location;
use crate::session::fake::{FakeGeolocator, FakeTokenStore};
use crate::session::session::Session;
use crate::test_utils::sample_event;
use std::sync::Arc;

async fn session_with_position(latitude: f64, longitude: f64) -> (Session, Arc<FakeGeolocator>) {
    let geolocator = Arc::new(FakeGeolocator::with_position(latitude, longitude));
    let session = Session::init(Arc::new(FakeTokenStore::new()), geolocator.clone())
        .await
        .unwrap();
    (session, geolocator)
}

#[tokio::test]
async fn listing_starts_in_loading_state() {
    let listing = EventListing::new(3);
    assert!(matches!(listing.state(), LoadState::Loading));
}

#[tokio::test]
async fn load_respects_the_page_limit() {
    let api = FakeApi::new();
    for id in 1..=5 {
        api.add_event(sample_event(id, &format!("Race {id}")));
    }
    let (session, _) = session_with_position(4.6, -74.08).await;

    let mut listing = EventListing::new(3);
    listing
        .load(&api, &session, &ListingFilters::default(), 1)
        .await
        .unwrap();

    assert_eq!(listing.events().len(), 3);
    assert_eq!(listing.total(), 5);
    let labels: Vec<String> = listing.events().iter().map(|e| e.distance_label()).collect();
    assert!(labels.iter().all(|label| label == "10KM"));
}

#[tokio::test]
async fn load_requests_device_position_once() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "Race"));
    let (session, geolocator) = session_with_position(4.6, -74.08).await;

    let mut listing = EventListing::new(3);
    let filters = ListingFilters::default();
    listing.load(&api, &session, &filters, 1).await.unwrap();
    listing.load(&api, &session, &filters, 1).await.unwrap();

    assert_eq!(geolocator.call_count(), 1);
}

#[tokio::test]
async fn explicit_city_filter_wins_over_device_position() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "Race"));
    let (session, geolocator) = session_with_position(4.6, -74.08).await;

    let filters = ListingFilters {
        city: Some(Location {
            name: "Medellín".to_string(),
            coordinates: [-75.57, 6.24],
        }),
        ..Default::default()
    };
    let mut listing = EventListing::new(3);
    listing.load(&api, &session, &filters, 1).await.unwrap();

    assert_eq!(geolocator.call_count(), 0);
}

#[tokio::test]
async fn empty_page_yields_the_empty_state() {
    let api = FakeApi::new();
    let (session, _) = session_with_position(4.6, -74.08).await;

    let mut listing = EventListing::new(3);
    listing
        .load(&api, &session, &ListingFilters::default(), 1)
        .await
        .unwrap();

    assert!(matches!(listing.state(), LoadState::Empty));
}

#[tokio::test]
async fn denied_geolocation_still_loads_without_coordinates() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "Race"));
    let geolocator = Arc::new(FakeGeolocator::new());
    geolocator.deny();
    let session = Session::init(Arc::new(FakeTokenStore::new()), geolocator)
        .await
        .unwrap();

    let mut listing = EventListing::new(3);
    listing
        .load(&api, &session, &ListingFilters::default(), 1)
        .await
        .unwrap();

    assert_eq!(listing.events().len(), 1);
}

#[tokio::test]
async fn apply_delete_removes_the_event_locally() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "Keep"));
    api.add_event(sample_event(2, "Drop"));
    let (session, _) = session_with_position(4.6, -74.08).await;

    let mut listing = EventListing::new(10);
    listing
        .load(&api, &session, &ListingFilters::default(), 1)
        .await
        .unwrap();

    listing.apply_delete(2);

    assert_eq!(listing.events().len(), 1);
    assert_eq!(listing.events()[0].id, Some(1));
    assert_eq!(listing.total(), 1);
}

#[tokio::test]
async fn deleting_the_last_event_flips_to_empty() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "Only"));
    let (session, _) = session_with_position(4.6, -74.08).await;

    let mut listing = EventListing::new(10);
    listing
        .load(&api, &session, &ListingFilters::default(), 1)
        .await
        .unwrap();

    listing.apply_delete(1);

    assert!(matches!(listing.state(), LoadState::Empty));
}

#[tokio::test]
async fn apply_update_replaces_the_event_in_place() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "Before"));
    api.add_event(sample_event(2, "Untouched"));
    let (session, _) = session_with_position(4.6, -74.08).await;

    let mut listing = EventListing::new(10);
    listing
        .load(&api, &session, &ListingFilters::default(), 1)
        .await
        .unwrap();

    listing.apply_update(&sample_event(1, "After"));

    assert_eq!(listing.events()[0].title, "After");
    assert_eq!(listing.events()[1].title, "Untouched");
}

#[tokio::test]
async fn detail_loads_exactly_one_event_by_id() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "First"));
    api.add_event(sample_event(2, "Second"));

    let mut detail = EventDetail::new();
    detail.load(&api, 2).await.unwrap();

    assert_eq!(detail.event().unwrap().title, "Second");
}

#[tokio::test]
async fn detail_reports_not_found_for_unknown_ids() {
    let api = FakeApi::new();
    api.add_event(sample_event(1, "First"));

    let mut detail = EventDetail::new();
    detail.load(&api, 99).await.unwrap();

    assert!(matches!(detail.state(), DetailState::NotFound));
    assert!(detail.event().is_none());
}
