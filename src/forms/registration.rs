use crate::api::client::ApiClient;
use crate::api::models::{
    BloodType, DocumentType, Event, RegistrationRequest, TshirtSize,
};
use crate::forms::error::{FormError, ValidationError};
use crate::geo::directory::GeoDirectory;
use crate::geo::error::GeoError;
use crate::session::token::TokenStore;
use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

/// Advisory shown when the runner is under 18. Registration proceeds.
pub const MINOR_ADVISORY: &str =
    "Los menores de edad deben contar con la autorización de un adulto responsable";

/// Completed years between two dates, at day granularity. The year count
/// only increments once the month and day have been reached.
pub fn exact_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Mutable state of the registration form for one event. Country,
/// department and city are chained selects backed by the geo directory.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    event_id: Option<i64>,
    offers_tshirt: bool,
    has_organizer_terms: bool,
    pub document_type: Option<DocumentType>,
    pub document_number: String,
    pub document_country: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    birth_date: Option<NaiveDate>,
    pub wants_tshirt: bool,
    pub tshirt_size: Option<TshirtSize>,
    pub health_service: String,
    pub blood_type: Option<BloodType>,
    country: String,
    department: String,
    city: String,
    departments: Vec<String>,
    cities: Vec<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub accepts_organizer_terms: bool,
    pub accepts_platform_terms: bool,
}

impl RegistrationForm {
    pub fn new(event: &Event) -> Self {
        RegistrationForm {
            event_id: event.id,
            offers_tshirt: event.offers_tshirt(),
            has_organizer_terms: event.terms_url.is_some(),
            document_type: None,
            document_number: String::new(),
            document_country: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            birth_date: None,
            wants_tshirt: false,
            tshirt_size: None,
            health_service: String::new(),
            blood_type: None,
            country: String::new(),
            department: String::new(),
            city: String::new(),
            departments: Vec::new(),
            cities: Vec::new(),
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            accepts_organizer_terms: false,
            accepts_platform_terms: false,
        }
    }

    pub fn offers_tshirt(&self) -> bool {
        self.offers_tshirt
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = Some(birth_date);
    }

    /// Age in completed years as of `today`, once a birth date is set.
    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        self.birth_date.map(|birth| exact_age(birth, today))
    }

    /// Non-blocking advisory for runners under 18.
    pub fn minor_advisory(&self, today: NaiveDate) -> Option<&'static str> {
        match self.age(today) {
            Some(age) if age < 18 => Some(MINOR_ADVISORY),
            _ => None,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Select a country: resets department and city and reloads the
    /// department options. A failed lookup leaves the options empty.
    pub async fn set_country<G: GeoDirectory>(
        &mut self,
        directory: &G,
        country: &str,
    ) -> Result<(), GeoError> {
        self.country = country.to_string();
        self.department.clear();
        self.city.clear();
        self.cities.clear();
        match directory.departments(country).await {
            Ok(departments) => {
                self.departments = departments;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load departments of {country}: {e}");
                self.departments.clear();
                Err(e)
            }
        }
    }

    /// Select a department: resets only the city and reloads the city
    /// options. A failed lookup leaves the options empty.
    pub async fn set_department<G: GeoDirectory>(
        &mut self,
        directory: &G,
        department: &str,
    ) -> Result<(), GeoError> {
        self.department = department.to_string();
        self.city.clear();
        match directory.cities(&self.country, department).await {
            Ok(cities) => {
                self.cities = cities;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load cities of {department}: {e}");
                self.cities.clear();
                Err(e)
            }
        }
    }

    pub fn set_city(&mut self, city: &str) {
        self.city = city.to_string();
    }

    fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.document_type.is_none() {
            return Err(ValidationError::MissingField("documentType"));
        }
        Self::require(&self.document_number, "documentNumber")?;
        Self::require(&self.document_country, "documentCountry")?;
        Self::require(&self.first_name, "firstName")?;
        Self::require(&self.last_name, "lastName")?;
        Self::require(&self.email, "email")?;
        Self::require(&self.phone, "phone")?;
        if self.birth_date.is_none() {
            return Err(ValidationError::MissingField("birthDate"));
        }
        Self::require(&self.health_service, "healthService")?;
        if self.blood_type.is_none() {
            return Err(ValidationError::MissingField("bloodType"));
        }
        Self::require(&self.country, "country")?;
        Self::require(&self.department, "department")?;
        Self::require(&self.city, "city")?;
        Self::require(&self.emergency_contact_name, "emergencyContactName")?;
        Self::require(&self.emergency_contact_phone, "emergencyContactPhone")?;

        // Size only matters when the event offers the upsell and the
        // runner opted in
        if self.offers_tshirt && self.wants_tshirt && self.tshirt_size.is_none() {
            return Err(ValidationError::MissingTshirtSize);
        }

        if self.has_organizer_terms && !self.accepts_organizer_terms {
            return Err(ValidationError::OrganizerTermsNotAccepted);
        }
        if !self.accepts_platform_terms {
            return Err(ValidationError::PlatformTermsNotAccepted);
        }
        Ok(())
    }

    fn build_request(&self) -> Result<RegistrationRequest, ValidationError> {
        self.validate()?;
        let event_id = self.event_id.ok_or(ValidationError::MissingField("event"))?;
        let (document_type, birth_date, blood_type) =
            match (self.document_type, self.birth_date, self.blood_type) {
                (Some(document_type), Some(birth_date), Some(blood_type)) => {
                    (document_type, birth_date, blood_type)
                }
                // validate() already rejected these
                _ => return Err(ValidationError::MissingField("documentType")),
            };
        Ok(RegistrationRequest {
            event_id,
            document_type,
            document_number: self.document_number.trim().to_string(),
            document_country: self.document_country.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            birth_date,
            tshirt_size: if self.offers_tshirt && self.wants_tshirt {
                self.tshirt_size
            } else {
                None
            },
            health_service: self.health_service.clone(),
            blood_type,
            country: self.country.clone(),
            department: self.department.clone(),
            city: self.city.clone(),
            emergency_contact_name: self.emergency_contact_name.trim().to_string(),
            emergency_contact_phone: self.emergency_contact_phone.trim().to_string(),
            accepts_organizer_terms: self.accepts_organizer_terms,
            accepts_platform_terms: self.accepts_platform_terms,
        })
    }

    /// Submit the registration for this form's event. Failure leaves the
    /// form populated for correction.
    pub async fn submit<A: ApiClient, S: TokenStore>(
        &self,
        api: &A,
        token_store: &S,
    ) -> Result<(), FormError> {
        let request = self.build_request()?;
        let token = token_store
            .load()
            .await
            .ok()
            .flatten()
            .ok_or(FormError::NotLoggedIn)?;
        api.submit_registration(&request, &token).await?;
        info!(
            "Registered {} {} for event {}",
            request.first_name, request.last_name, request.event_id
        );
        Ok(())
    }
}
