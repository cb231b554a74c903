use super::client::ApiClient;
use super::error::ApiError;
use super::fake::FakeApi;
use super::http::{server_message, HttpApiClient};
use super::models::{
    BloodType, ConfirmUploadRequest, CreateEventRequest, DistanceUnit, DocumentType,
    EventFilters, EventType, GenerateUploadUrlResponse, RegistrationRequest, TshirtSize,
};
use crate::session::fake::FakeTokenStore;
use crate::session::token::TokenStore;
use crate::test_utils::sample_event;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn sample_create_request(title: &str) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: "A race".to_string(),
        image_url: "https://cdn.fake/cover.jpg".to_string(),
        price: 50000.0,
        price_unit: "COP".to_string(),
        distance: 10.0,
        distance_unit: DistanceUnit::Kilometers,
        event_type: EventType::ShortDistanceRace,
        date: "2025-06-01T08:00:00Z".to_string(),
        files: None,
        coordinates: [-74.08, 4.6],
        city: "Bogotá".to_string(),
        amenities: None,
        terms_url: None,
        include_tshirt: None,
        tshirt_price: None,
    }
}

#[test]
fn server_message_returns_first_error_from_structured_body() {
    let body = r#"{"errors":[{"message":"El correo ya está registrado"},{"message":"other"}]}"#;
    let message = server_message(reqwest::StatusCode::BAD_REQUEST, body);
    assert_eq!(message, "El correo ya está registrado");
}

#[test]
fn server_message_falls_back_to_status_text_for_unparseable_body() {
    let message = server_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
    assert_eq!(message, "Internal Server Error");
}

#[test]
fn server_message_falls_back_when_errors_array_is_empty() {
    let message = server_message(reqwest::StatusCode::BAD_REQUEST, r#"{"errors":[]}"#);
    assert_eq!(message, "Bad Request");
}

#[test]
fn event_filters_skip_unset_fields() {
    let filters = EventFilters {
        limit: Some(3),
        latitude: Some(4.6),
        longitude: Some(-74.08),
        ..Default::default()
    };
    let pairs = filters.to_query_pairs();
    assert_eq!(
        pairs,
        vec![
            ("limit", "3".to_string()),
            ("latitude", "4.6".to_string()),
            ("longitude", "-74.08".to_string()),
        ]
    );
}

#[test]
fn event_filters_serialize_event_type_with_wire_name() {
    let filters = EventFilters {
        event_type: Some(EventType::CharityRaceOrRaceWithACause),
        ..Default::default()
    };
    let pairs = filters.to_query_pairs();
    assert_eq!(
        pairs,
        vec![("type", "charity_race_or_race_with_a_cause".to_string())]
    );
}

#[test]
fn distance_label_drops_trailing_zeros_for_whole_distances() {
    let mut event = sample_event(1, "10K");
    assert_eq!(event.distance_label(), "10KM");

    event.distance = 5.5;
    assert_eq!(event.distance_label(), "5.5KM");

    event.distance = 3.0;
    event.distance_unit = DistanceUnit::Miles;
    assert_eq!(event.distance_label(), "3MI");
}

#[test]
fn upload_url_response_uses_camel_case_wire_names() {
    let parsed: GenerateUploadUrlResponse = serde_json::from_str(
        r#"{"uploadUrl":"https://uploads.fake/a.jpg","s3Key":"objects/a.jpg"}"#,
    )
    .unwrap();
    assert_eq!(parsed.upload_url, "https://uploads.fake/a.jpg");
    assert_eq!(parsed.s3_key, "objects/a.jpg");

    let request = ConfirmUploadRequest {
        file_name: "a.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        s3_key: "objects/a.jpg".to_string(),
    };
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains(r#""s3Key":"objects/a.jpg""#));
    assert!(json.contains(r#""fileName":"a.jpg""#));
}

#[test]
fn create_event_request_omits_unset_optional_fields() {
    let request = sample_create_request("10K");
    let json = serde_json::to_string(&request).unwrap();
    assert!(!json.contains("files"));
    assert!(!json.contains("amenities"));
    assert!(!json.contains("termsUrl"));
    assert!(!json.contains("includeTshirt"));
    assert!(json.contains(r#""type":"short_distance_race""#));
    assert!(json.contains(r#""date":"2025-06-01T08:00:00Z""#));
    assert!(json.contains(r#""imageUrl":"https://cdn.fake/cover.jpg""#));
}

#[test]
fn registration_serializes_enum_wire_names() {
    let registration = RegistrationRequest {
        event_id: 7,
        document_type: DocumentType::Cc,
        document_number: "123456".to_string(),
        document_country: "Colombia".to_string(),
        first_name: "Ana".to_string(),
        last_name: "Pérez".to_string(),
        email: "ana@example.com".to_string(),
        phone: "3001234567".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
        tshirt_size: Some(TshirtSize::Xl),
        health_service: "EPS Sura".to_string(),
        blood_type: BloodType::OPositive,
        country: "Colombia".to_string(),
        department: "Cundinamarca".to_string(),
        city: "Bogotá".to_string(),
        emergency_contact_name: "Luis Pérez".to_string(),
        emergency_contact_phone: "3007654321".to_string(),
        accepts_organizer_terms: true,
        accepts_platform_terms: true,
    };
    let json = serde_json::to_string(&registration).unwrap();
    assert!(json.contains(r#""documentType":"CC""#));
    assert!(json.contains(r#""bloodType":"O+""#));
    assert!(json.contains(r#""tshirtSize":"XL""#));
    assert!(json.contains(r#""birthDate":"1995-04-12""#));
}

#[test]
fn event_types_expose_wire_name_and_display_label() {
    assert_eq!(EventType::TrailRace.as_str(), "trail_race");
    assert_eq!(EventType::TrailRace.label(), "Carrera de trail");
    assert_eq!(
        "trail_race".parse::<EventType>().unwrap(),
        EventType::TrailRace
    );
}

#[tokio::test]
async fn cancelled_call_returns_cancelled_without_clearing_the_store() {
    let store = Arc::new(FakeTokenStore::with_token("token"));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let api = HttpApiClient::new("http://localhost:9", store.clone()).with_cancellation(cancel);

    let result = api.get_events(&EventFilters::default()).await;

    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert_eq!(store.load().await.unwrap(), Some("token".to_string()));
}

#[tokio::test]
async fn unauthorized_call_clears_attached_token_store() {
    let api = FakeApi::new();
    api.set_valid_token("good-token");
    let store = Arc::new(FakeTokenStore::with_token("stale-token"));
    api.attach_token_store(store.clone());

    let result = api.current_user("stale-token").await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn created_event_appears_in_listing_and_by_id_lookup() {
    let api = FakeApi::new();
    api.set_valid_token("token");

    let created = api
        .create_event(&sample_create_request("Night Run"), "token")
        .await
        .unwrap();
    let id = created.id.unwrap();

    let page = api.get_events(&EventFilters::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].title, "Night Run");

    let by_id = api.get_events(&EventFilters::by_id(id)).await.unwrap();
    assert_eq!(by_id.data.len(), 1);
    assert_eq!(by_id.data[0].id, Some(id));
}

#[tokio::test]
async fn deleted_event_no_longer_listed() {
    let api = FakeApi::new();
    api.set_valid_token("token");
    api.add_event(sample_event(3, "Trail Fest"));

    api.delete_event(3, "token").await.unwrap();

    let page = api.get_events(&EventFilters::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(api.deleted_events(), vec![3]);
}

#[tokio::test]
async fn failed_operation_surfaces_api_error() {
    let api = FakeApi::new();
    api.set_valid_token("token");
    api.fail_operation("create_event");

    let result = api
        .create_event(&sample_create_request("10K"), "token")
        .await;

    assert!(matches!(result, Err(ApiError::Api(_))));
    assert!(api.created_events().is_empty());
}

#[tokio::test]
async fn cleared_failures_let_the_operation_succeed_again() {
    let api = FakeApi::new();
    api.set_valid_token("token");
    api.fail_operation("create_event");
    assert!(api
        .create_event(&sample_create_request("10K"), "token")
        .await
        .is_err());

    api.clear_failures();

    assert!(api
        .create_event(&sample_create_request("10K"), "token")
        .await
        .is_ok());
    assert_eq!(api.created_events().len(), 1);
}
