use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{
    AuthResponse, ConfirmUploadRequest, ConfirmUploadResponse, CreateEventRequest, Event,
    EventFilters, GenerateUploadUrlRequest, GenerateUploadUrlResponse, GeoPoint, Location,
    PaginatedResponse, RegistrationRequest, SignInRequest, SignUpRequest, UserProfile,
};
use crate::session::token::TokenStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Default)]
struct FakeApiState {
    valid_token: Option<String>,
    user: Option<UserProfile>,
    events: Vec<Event>,
    locations: HashMap<String, Vec<Location>>,
    registrations: Vec<RegistrationRequest>,
    created: Vec<CreateEventRequest>,
    updated: Vec<(i64, CreateEventRequest)>,
    deleted: Vec<i64>,
    fail_operations: HashSet<String>,
    calls: Vec<String>,
    next_id: i64,
}

/// In-memory implementation of the ApiClient trait for testing.
///
/// Mirrors the real client's credential contract: any operation receiving a
/// token other than the configured valid one returns Unauthorized and clears
/// the attached token store, if one was attached.
pub struct FakeApi {
    state: Mutex<FakeApiState>,
    token_store: Mutex<Option<Arc<dyn TokenStore>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi {
            state: Mutex::new(FakeApiState {
                next_id: 1,
                ..Default::default()
            }),
            token_store: Mutex::new(None),
        }
    }

    /// Attach a token store to be cleared whenever a call is rejected with
    /// 401 semantics, as the real client does.
    pub fn attach_token_store(&self, store: Arc<dyn TokenStore>) {
        *self.token_store.lock().unwrap() = Some(store);
    }

    /// Configure the only token the fake accepts.
    pub fn set_valid_token(&self, token: &str) {
        self.state.lock().unwrap().valid_token = Some(token.to_string());
    }

    pub fn set_user(&self, user: UserProfile) {
        self.state.lock().unwrap().user = Some(user);
    }

    pub fn add_event(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn set_locations(&self, query: &str, locations: Vec<Location>) {
        self.state
            .lock()
            .unwrap()
            .locations
            .insert(query.to_string(), locations);
    }

    /// Make a named operation fail with a server-style message.
    pub fn fail_operation(&self, operation: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_operations
            .insert(operation.to_string());
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().fail_operations.clear();
    }

    /// Names of operations invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn created_events(&self) -> Vec<CreateEventRequest> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updated_events(&self) -> Vec<(i64, CreateEventRequest)> {
        self.state.lock().unwrap().updated.clone()
    }

    pub fn deleted_events(&self) -> Vec<i64> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn registrations(&self) -> Vec<RegistrationRequest> {
        self.state.lock().unwrap().registrations.clone()
    }

    fn record(&self, operation: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation.to_string());
        if state.fail_operations.contains(operation) {
            debug!("[FAKE] Simulating failure for operation: {operation}");
            return Err(ApiError::Api(format!("Simulated failure in {operation}")));
        }
        Ok(())
    }

    async fn authorize(&self, token: &str) -> Result<(), ApiError> {
        let valid = {
            let state = self.state.lock().unwrap();
            state.valid_token.as_deref() == Some(token)
        };
        if valid {
            return Ok(());
        }
        debug!("[FAKE] Rejecting invalid token");
        let store = self.token_store.lock().unwrap().clone();
        if let Some(store) = store {
            let _ = store.clear().await;
        }
        Err(ApiError::Unauthorized)
    }

    fn event_from_request(id: i64, request: &CreateEventRequest) -> Event {
        Event {
            id: Some(id),
            user_id: Some(1),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            deleted_at: None,
            title: request.title.clone(),
            description: request.description.clone(),
            image_url: request.image_url.clone(),
            files: request.files.clone().unwrap_or_default(),
            terms_url: request.terms_url.clone(),
            date: request
                .date
                .parse()
                .unwrap_or_else(|_| Utc::now()),
            price: request.price,
            price_unit: request.price_unit.clone(),
            include_tshirt: request.include_tshirt,
            tshirt_price: request.tshirt_price,
            distance: request.distance,
            distance_unit: request.distance_unit,
            event_type: request.event_type,
            city: request.city.clone(),
            location: GeoPoint::new(request.coordinates[0], request.coordinates[1]),
            amenities: request.amenities.clone().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        self.record("sign_up")?;
        debug!("[FAKE] Signing up: {}", request.email);
        let token = format!("token-for-{}", request.email);
        self.state.lock().unwrap().valid_token = Some(token.clone());
        Ok(AuthResponse { token })
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, ApiError> {
        self.record("sign_in")?;
        debug!("[FAKE] Signing in: {}", request.email);
        let token = format!("token-for-{}", request.email);
        self.state.lock().unwrap().valid_token = Some(token.clone());
        Ok(AuthResponse { token })
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.record("current_user")?;
        self.authorize(token).await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .user
            .clone()
            .unwrap_or_default())
    }

    async fn search_locations(&self, query: &str, token: &str) -> Result<Vec<Location>, ApiError> {
        self.record("search_locations")?;
        self.authorize(token).await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .locations
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_events(
        &self,
        filters: &EventFilters,
    ) -> Result<PaginatedResponse<Event>, ApiError> {
        self.record("get_events")?;
        let state = self.state.lock().unwrap();
        let matching: Vec<Event> = state
            .events
            .iter()
            .filter(|event| match filters.id {
                Some(id) => event.id == Some(id),
                None => true,
            })
            .filter(|event| match filters.event_type {
                Some(event_type) => event.event_type == event_type,
                None => true,
            })
            .filter(|event| match filters.user {
                Some(user) => event.user_id == Some(user),
                None => true,
            })
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let page = filters.page.unwrap_or(1);
        let limit = filters.limit.unwrap_or(10);
        let start = ((page - 1) * limit) as usize;
        let data = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Ok(PaginatedResponse {
            total,
            page,
            limit,
            data,
        })
    }

    async fn create_event(
        &self,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError> {
        self.record("create_event")?;
        self.authorize(token).await?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let event = Self::event_from_request(id, request);
        state.events.push(event.clone());
        state.created.push(request.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        id: i64,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError> {
        self.record("update_event")?;
        self.authorize(token).await?;
        let mut state = self.state.lock().unwrap();
        if !state.events.iter().any(|event| event.id == Some(id)) {
            return Err(ApiError::Api(format!("Event {id} not found")));
        }
        let event = Self::event_from_request(id, request);
        state.events.retain(|existing| existing.id != Some(id));
        state.events.push(event.clone());
        state.updated.push((id, request.clone()));
        Ok(event)
    }

    async fn delete_event(&self, id: i64, token: &str) -> Result<(), ApiError> {
        self.record("delete_event")?;
        self.authorize(token).await?;
        let mut state = self.state.lock().unwrap();
        state.events.retain(|event| event.id != Some(id));
        state.deleted.push(id);
        Ok(())
    }

    async fn generate_upload_url(
        &self,
        request: &GenerateUploadUrlRequest,
        token: &str,
    ) -> Result<GenerateUploadUrlResponse, ApiError> {
        self.record("generate_upload_url")?;
        self.authorize(token).await?;
        Ok(GenerateUploadUrlResponse {
            upload_url: format!("https://uploads.fake/{}", request.file_name),
            s3_key: format!("objects/{}", request.file_name),
        })
    }

    async fn confirm_upload(
        &self,
        request: &ConfirmUploadRequest,
        token: &str,
    ) -> Result<ConfirmUploadResponse, ApiError> {
        self.record("confirm_upload")?;
        self.authorize(token).await?;
        Ok(ConfirmUploadResponse {
            file: format!("https://cdn.fake/{}", request.s3_key),
        })
    }

    async fn submit_registration(
        &self,
        registration: &RegistrationRequest,
        token: &str,
    ) -> Result<(), ApiError> {
        self.record("submit_registration")?;
        self.authorize(token).await?;
        self.state
            .lock()
            .unwrap()
            .registrations
            .push(registration.clone());
        Ok(())
    }
}
