use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Distance unit for an event, serialized with the wire names the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Kilometers,
    Miles,
    Laps,
}

impl DistanceUnit {
    /// Short symbol shown on event cards, e.g. `10KM`.
    pub fn symbol(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "KM",
            DistanceUnit::Miles => "MI",
            DistanceUnit::Laps => "LAPS",
        }
    }
}

/// Closed enumeration of race sub-types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ShortDistanceRace,
    MediumDistanceRace,
    LongDistanceRace,
    TrailRace,
    TematicOrRecreationalRace,
    AsphaltRace,
    CharityRaceOrRaceWithACause,
    ObstacleRace,
    IndividualRace,
    TeamRace,
    RaceWithATheme,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ShortDistanceRace => "short_distance_race",
            EventType::MediumDistanceRace => "medium_distance_race",
            EventType::LongDistanceRace => "long_distance_race",
            EventType::TrailRace => "trail_race",
            EventType::TematicOrRecreationalRace => "tematic_or_recreational_race",
            EventType::AsphaltRace => "asphalt_race",
            EventType::CharityRaceOrRaceWithACause => "charity_race_or_race_with_a_cause",
            EventType::ObstacleRace => "obstacle_race",
            EventType::IndividualRace => "individual_race",
            EventType::TeamRace => "team_race",
            EventType::RaceWithATheme => "race_with_a_theme",
            EventType::Other => "other",
        }
    }

    /// Display label shown in the authoring form.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::ShortDistanceRace => "Carrera de corta distancia",
            EventType::MediumDistanceRace => "Carrera de media distancia",
            EventType::LongDistanceRace => "Carrera de larga distancia",
            EventType::TrailRace => "Carrera de trail",
            EventType::TematicOrRecreationalRace => "Carrera tematica o recreativa",
            EventType::AsphaltRace => "Carrera en Asfalto",
            EventType::CharityRaceOrRaceWithACause => "Carrera Benefica o con Causa",
            EventType::ObstacleRace => "Carrera de Obstaculos",
            EventType::IndividualRace => "Carrera individual",
            EventType::TeamRace => "Carrera en Equipos",
            EventType::RaceWithATheme => "Carrera con tema",
            EventType::Other => "Otro",
        }
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kilometers" | "km" => Ok(DistanceUnit::Kilometers),
            "miles" | "mi" => Ok(DistanceUnit::Miles),
            "laps" => Ok(DistanceUnit::Laps),
            other => Err(format!("Unknown distance unit: {other}")),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_distance_race" => Ok(EventType::ShortDistanceRace),
            "medium_distance_race" => Ok(EventType::MediumDistanceRace),
            "long_distance_race" => Ok(EventType::LongDistanceRace),
            "trail_race" => Ok(EventType::TrailRace),
            "tematic_or_recreational_race" => Ok(EventType::TematicOrRecreationalRace),
            "asphalt_race" => Ok(EventType::AsphaltRace),
            "charity_race_or_race_with_a_cause" => Ok(EventType::CharityRaceOrRaceWithACause),
            "obstacle_race" => Ok(EventType::ObstacleRace),
            "individual_race" => Ok(EventType::IndividualRace),
            "team_race" => Ok(EventType::TeamRace),
            "race_with_a_theme" => Ok(EventType::RaceWithATheme),
            "other" => Ok(EventType::Other),
            other => Err(format!("Unknown event type: {other}")),
        }
    }
}

fn default_point_kind() -> String {
    "Point".to_string()
}

/// GeoJSON-style point; coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "default_point_kind")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        GeoPoint {
            kind: default_point_kind(),
            coordinates: [longitude, latitude],
        }
    }
}

/// A race event as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker; deletion semantics are the server's contract,
    /// the client only issues delete requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_url: Option<String>,
    pub date: DateTime<Utc>,
    pub price: f64,
    pub price_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tshirt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tshirt_price: Option<f64>,
    pub distance: f64,
    pub distance_unit: DistanceUnit,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub city: String,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl Event {
    /// Whether the event is configured with the optional T-shirt upsell.
    pub fn offers_tshirt(&self) -> bool {
        self.include_tshirt.unwrap_or(false)
    }

    /// Card label combining distance and unit symbol, e.g. `10KM`.
    pub fn distance_label(&self) -> String {
        if self.distance.fract() == 0.0 {
            format!("{}{}", self.distance as i64, self.distance_unit.symbol())
        } else {
            format!("{}{}", self.distance, self.distance_unit.symbol())
        }
    }
}

/// A location suggestion from the search-as-you-type endpoint; never
/// persisted beyond the active form session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<T>,
}

/// Filters for the paginated event listing. `None` fields are omitted from
/// the query string entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilters {
    pub user: Option<i64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub event_type: Option<EventType>,
}

impl EventFilters {
    pub fn by_id(id: i64) -> Self {
        EventFilters {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Serialize the filters into query pairs, skipping unset fields.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user) = self.user {
            pairs.push(("user", user.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(latitude) = self.latitude {
            pairs.push(("latitude", latitude.to_string()));
        }
        if let Some(longitude) = self.longitude {
            pairs.push(("longitude", longitude.to_string()));
        }
        if let Some(id) = self.id {
            pairs.push(("id", id.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        if let Some(event_type) = self.event_type {
            pairs.push(("type", event_type.as_str().to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlRequest {
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlResponse {
    pub upload_url: String,
    pub s3_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub s3_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmUploadResponse {
    /// Durable URL of the uploaded object.
    pub file: String,
}

/// Descriptor for a file that completed the three-step upload pipeline.
/// Only the pipeline constructs these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub s3_key: String,
    pub file_url: String,
}

/// Payload for creating or replacing an event. `date` is the single
/// combined UTC timestamp, e.g. `2025-06-01T08:00:00Z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub price_unit: String,
    pub distance: f64,
    pub distance_unit: DistanceUnit,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    pub coordinates: [f64; 2],
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tshirt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tshirt_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "CC")]
    Cc,
    #[serde(rename = "TI")]
    Ti,
    #[serde(rename = "NIT")]
    Nit,
    #[serde(rename = "Pasaporte")]
    Pasaporte,
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CC" => Ok(DocumentType::Cc),
            "TI" => Ok(DocumentType::Ti),
            "NIT" => Ok(DocumentType::Nit),
            "PASAPORTE" => Ok(DocumentType::Pasaporte),
            other => Err(format!("Unknown document type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TshirtSize {
    S,
    M,
    L,
    #[serde(rename = "XL")]
    Xl,
}

impl std::str::FromStr for TshirtSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "S" => Ok(TshirtSize::S),
            "M" => Ok(TshirtSize::M),
            "L" => Ok(TshirtSize::L),
            "XL" => Ok(TshirtSize::Xl),
            other => Err(format!("Unknown t-shirt size: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl std::str::FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            other => Err(format!("Unknown blood type: {other}")),
        }
    }
}

/// A runner's registration for one event, as posted to the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub event_id: i64,
    pub document_type: DocumentType,
    pub document_number: String,
    pub document_country: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tshirt_size: Option<TshirtSize>,
    pub health_service: String,
    pub blood_type: BloodType,
    pub country: String,
    pub department: String,
    pub city: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub accepts_organizer_terms: bool,
    pub accepts_platform_terms: bool,
}
