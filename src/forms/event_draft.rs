use crate::api::client::ApiClient;
use crate::api::models::{
    CreateEventRequest, DistanceUnit, Event, EventType, Location, UploadedFile,
};
use crate::forms::error::{FormError, ValidationError};
use crate::session::token::TokenStore;
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

/// Combine separate date (`2025-06-01`) and time (`08:00`) inputs into the
/// single UTC timestamp the API expects: `2025-06-01T08:00:00Z`.
pub fn combine_date_time(date: &str, time: &str) -> Result<String, ValidationError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(time.to_string()))?;
    Ok(date.and_time(time).format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Mutable state of the event authoring form. Starts empty for a new event
/// or pre-filled from an existing one when editing; `submit` decides between
/// create and replace based on that origin.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    editing_id: Option<i64>,
    min_query_len: usize,
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub price: Option<f64>,
    pub price_unit: String,
    pub distance: Option<f64>,
    pub distance_unit: Option<DistanceUnit>,
    pub event_type: Option<EventType>,
    city: String,
    coordinates: Option<[f64; 2]>,
    cover_url: Option<String>,
    terms_url: Option<String>,
    pub include_tshirt: bool,
    pub tshirt_price: Option<f64>,
    files: Vec<String>,
    pub amenities: Vec<String>,
}

impl EventDraft {
    pub fn new(min_query_len: usize) -> Self {
        EventDraft {
            min_query_len,
            ..Default::default()
        }
    }

    /// Pre-fill the draft from an existing event for editing.
    pub fn from_event(event: &Event, min_query_len: usize) -> Self {
        EventDraft {
            editing_id: event.id,
            min_query_len,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            start_time: event.date.format("%H:%M").to_string(),
            price: Some(event.price),
            price_unit: event.price_unit.clone(),
            distance: Some(event.distance),
            distance_unit: Some(event.distance_unit),
            event_type: Some(event.event_type),
            city: event.city.clone(),
            coordinates: Some(event.location.coordinates),
            cover_url: Some(event.image_url.clone()),
            terms_url: event.terms_url.clone(),
            include_tshirt: event.include_tshirt.unwrap_or(false),
            tshirt_price: event.tshirt_price,
            files: event.files.clone(),
            amenities: event.amenities.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn coordinates(&self) -> Option<[f64; 2]> {
        self.coordinates
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    pub fn terms_url(&self) -> Option<&str> {
        self.terms_url.as_deref()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Free typing in the city field keeps the text but invalidates any
    /// previously committed coordinates.
    pub fn set_city(&mut self, text: &str) {
        self.city = text.to_string();
        self.coordinates = None;
    }

    /// Choosing a suggestion commits both the display name and the point.
    pub fn select_city(&mut self, location: &Location) {
        self.city = location.name.clone();
        self.coordinates = Some(location.coordinates);
    }

    /// Search-as-you-type lookup. Queries shorter than the configured
    /// minimum return no suggestions without touching the network.
    pub async fn search_cities<A: ApiClient>(
        &self,
        api: &A,
        token: &str,
        query: &str,
    ) -> Result<Vec<Location>, FormError> {
        if query.chars().count() < self.min_query_len {
            return Ok(Vec::new());
        }
        debug!("Searching city suggestions for: {query}");
        Ok(api.search_locations(query, token).await?)
    }

    /// Store the durable URL of an uploaded cover image.
    pub fn set_cover(&mut self, uploaded: &UploadedFile) {
        self.cover_url = Some(uploaded.file_url.clone());
    }

    /// Store the durable URL of an uploaded terms document.
    pub fn set_terms(&mut self, uploaded: &UploadedFile) {
        self.terms_url = Some(uploaded.file_url.clone());
    }

    /// Append a secondary media file.
    pub fn add_file(&mut self, uploaded: &UploadedFile) {
        self.files.push(uploaded.file_url.clone());
    }

    pub fn remove_file(&mut self, file_url: &str) {
        self.files.retain(|existing| existing != file_url);
    }

    /// Assemble the wire payload, validating required fields and combining
    /// date and time. Empty optional arrays are stripped entirely.
    pub fn build_request(&self) -> Result<CreateEventRequest, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        let image_url = self
            .cover_url
            .clone()
            .ok_or(ValidationError::MissingField("image"))?;
        let price = self.price.ok_or(ValidationError::MissingField("price"))?;
        if self.price_unit.trim().is_empty() {
            return Err(ValidationError::MissingField("priceUnit"));
        }
        let distance = self
            .distance
            .ok_or(ValidationError::MissingField("distance"))?;
        let distance_unit = self
            .distance_unit
            .ok_or(ValidationError::MissingField("distanceUnit"))?;
        let event_type = self
            .event_type
            .ok_or(ValidationError::MissingField("type"))?;
        if self.city.trim().is_empty() {
            return Err(ValidationError::MissingField("city"));
        }
        let coordinates = self
            .coordinates
            .ok_or(ValidationError::MissingField("coordinates"))?;
        let date = combine_date_time(&self.date, &self.start_time)?;

        Ok(CreateEventRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url,
            price,
            price_unit: self.price_unit.clone(),
            distance,
            distance_unit,
            event_type,
            date,
            files: if self.files.is_empty() {
                None
            } else {
                Some(self.files.clone())
            },
            coordinates,
            city: self.city.clone(),
            amenities: if self.amenities.is_empty() {
                None
            } else {
                Some(self.amenities.clone())
            },
            terms_url: self.terms_url.clone(),
            include_tshirt: if self.include_tshirt { Some(true) } else { None },
            tshirt_price: if self.include_tshirt {
                self.tshirt_price
            } else {
                None
            },
        })
    }

    /// Submit the draft. The bearer token is re-read from the persisted
    /// store rather than trusted from memory. On success the draft resets
    /// to empty; on failure it stays intact for correction.
    pub async fn submit<A: ApiClient, S: TokenStore>(
        &mut self,
        api: &A,
        token_store: &S,
    ) -> Result<Event, FormError> {
        let request = self.build_request()?;
        let token = token_store
            .load()
            .await
            .ok()
            .flatten()
            .ok_or(FormError::NotLoggedIn)?;

        let event = match self.editing_id {
            Some(id) => {
                info!("Replacing event {id}: {}", request.title);
                api.update_event(id, &request, &token).await?
            }
            None => {
                info!("Creating event: {}", request.title);
                api.create_event(&request, &token).await?
            }
        };

        *self = EventDraft::new(self.min_query_len);
        Ok(event)
    }
}
