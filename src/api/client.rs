use crate::api::error::ApiError;
use crate::api::models::{
    AuthResponse, ConfirmUploadRequest, ConfirmUploadResponse, CreateEventRequest, Event,
    EventFilters, GenerateUploadUrlRequest, GenerateUploadUrlResponse, Location,
    PaginatedResponse, RegistrationRequest, SignInRequest, SignUpRequest, UserProfile,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Typed wrapper over the Runnify REST API. Every call issues exactly one
/// request and surfaces the first failure to its caller; nothing is retried.
#[async_trait]
pub trait ApiClient: Send + Sync + 'static {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError>;

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, ApiError>;

    /// Resolve the profile of the logged-in user.
    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError>;

    /// Search-as-you-type city lookup; bearer-authenticated.
    async fn search_locations(&self, query: &str, token: &str) -> Result<Vec<Location>, ApiError>;

    /// Paginated event listing; unauthenticated.
    async fn get_events(
        &self,
        filters: &EventFilters,
    ) -> Result<PaginatedResponse<Event>, ApiError>;

    async fn create_event(
        &self,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError>;

    /// Full-object replace of an existing event.
    async fn update_event(
        &self,
        id: i64,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError>;

    async fn delete_event(&self, id: i64, token: &str) -> Result<(), ApiError>;

    /// Step 1 of the upload pipeline: request a pre-signed upload target.
    async fn generate_upload_url(
        &self,
        request: &GenerateUploadUrlRequest,
        token: &str,
    ) -> Result<GenerateUploadUrlResponse, ApiError>;

    /// Step 3 of the upload pipeline: confirm the transfer and obtain the
    /// durable URL.
    async fn confirm_upload(
        &self,
        request: &ConfirmUploadRequest,
        token: &str,
    ) -> Result<ConfirmUploadResponse, ApiError>;

    async fn submit_registration(
        &self,
        registration: &RegistrationRequest,
        token: &str,
    ) -> Result<(), ApiError>;
}

/// Implementation of ApiClient for Arc<T> where T implements ApiClient,
/// so one client can be shared across flows.
#[async_trait]
impl<T: ApiClient + ?Sized> ApiClient for Arc<T> {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        (**self).sign_up(request).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, ApiError> {
        (**self).sign_in(request).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        (**self).current_user(token).await
    }

    async fn search_locations(&self, query: &str, token: &str) -> Result<Vec<Location>, ApiError> {
        (**self).search_locations(query, token).await
    }

    async fn get_events(
        &self,
        filters: &EventFilters,
    ) -> Result<PaginatedResponse<Event>, ApiError> {
        (**self).get_events(filters).await
    }

    async fn create_event(
        &self,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError> {
        (**self).create_event(request, token).await
    }

    async fn update_event(
        &self,
        id: i64,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError> {
        (**self).update_event(id, request, token).await
    }

    async fn delete_event(&self, id: i64, token: &str) -> Result<(), ApiError> {
        (**self).delete_event(id, token).await
    }

    async fn generate_upload_url(
        &self,
        request: &GenerateUploadUrlRequest,
        token: &str,
    ) -> Result<GenerateUploadUrlResponse, ApiError> {
        (**self).generate_upload_url(request, token).await
    }

    async fn confirm_upload(
        &self,
        request: &ConfirmUploadRequest,
        token: &str,
    ) -> Result<ConfirmUploadResponse, ApiError> {
        (**self).confirm_upload(request, token).await
    }

    async fn submit_registration(
        &self,
        registration: &RegistrationRequest,
        token: &str,
    ) -> Result<(), ApiError> {
        (**self).submit_registration(registration, token).await
    }
}
