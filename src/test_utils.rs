use crate::api::models::{DistanceUnit, Event, EventType, GeoPoint};
use chrono::{TimeZone, Utc};

/// A plain 10KM race in Bogotá with the given id and title.
pub fn sample_event(id: i64, title: &str) -> Event {
    Event {
        id: Some(id),
        user_id: Some(1),
        created_at: None,
        updated_at: None,
        deleted_at: None,
        title: title.to_string(),
        description: "A race".to_string(),
        image_url: "https://cdn.fake/cover.jpg".to_string(),
        files: vec![],
        terms_url: None,
        date: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        price: 50000.0,
        price_unit: "COP".to_string(),
        include_tshirt: None,
        tshirt_price: None,
        distance: 10.0,
        distance_unit: DistanceUnit::Kilometers,
        event_type: EventType::ShortDistanceRace,
        city: "Bogotá".to_string(),
        location: GeoPoint::new(-74.08, 4.6),
        amenities: vec![],
    }
}
