use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{
    AuthResponse, ConfirmUploadRequest, ConfirmUploadResponse, CreateEventRequest, Event,
    EventFilters, GenerateUploadUrlRequest, GenerateUploadUrlResponse, Location,
    PaginatedResponse, RegistrationRequest, SignInRequest, SignUpRequest, UserProfile,
};
use crate::session::token::TokenStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Shape of the API's structured error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Option<Vec<ErrorDetail>>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract the server's error message from a non-2xx body, falling back to
/// the HTTP status text.
pub(crate) fn server_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors)
        .and_then(|mut errors| {
            if errors.is_empty() {
                None
            } else {
                Some(errors.remove(0).message)
            }
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

/// Real HTTP implementation of the ApiClient trait backed by reqwest.
///
/// On a 401 response the persisted token is cleared before the error is
/// returned, so no later authenticated call in the same user action can
/// proceed with stale credentials.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    token_store: Arc<dyn TokenStore>,
    cancel: CancellationToken,
}

impl HttpApiClient {
    pub fn new(base_url: &str, token_store: Arc<dyn TokenStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        HttpApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_store,
            cancel: CancellationToken::new(),
        }
    }

    /// Scope this client to a cancellation token. Calls in flight when the
    /// token is cancelled resolve to `ApiError::Cancelled` and perform no
    /// state updates.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        let mut scoped = self.clone();
        scoped.cancel = cancel;
        scoped
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        tokio::select! {
            // An already-cancelled token wins before the request is sent
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Request abandoned through cancellation token");
                Err(ApiError::Cancelled)
            }
            response = request.send() => {
                response.map_err(|e| ApiError::Transport(e.to_string()))
            }
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Received 401 from API, clearing stored credentials");
            if let Err(e) = self.token_store.clear().await {
                error!("Failed to clear stored token after 401: {e}");
            }
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Api(server_message(status, &body)))
    }

    async fn parse<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = self.send(request).await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        debug!("Signing up user: {}", request.email);
        self.post_json("/api/v1/auth/signup", request, None).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, ApiError> {
        debug!("Signing in user: {}", request.email);
        self.post_json("/api/v1/auth/login", request, None).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self.http.get(self.url("/api/v1/users/me")).bearer_auth(token);
        let response = self.send(request).await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn search_locations(&self, query: &str, token: &str) -> Result<Vec<Location>, ApiError> {
        debug!("Searching locations for query: {query}");
        let request = self
            .http
            .get(self.url("/api/v1/locations"))
            .query(&[("name", query)])
            .bearer_auth(token);
        let response = self.send(request).await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn get_events(
        &self,
        filters: &EventFilters,
    ) -> Result<PaginatedResponse<Event>, ApiError> {
        let pairs = filters.to_query_pairs();
        debug!("Fetching events with {} filter(s)", pairs.len());
        let request = self.http.get(self.url("/api/v1/events")).query(&pairs);
        let response = self.send(request).await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn create_event(
        &self,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError> {
        debug!("Creating event: {}", request.title);
        self.post_json("/api/v1/events", request, Some(token)).await
    }

    async fn update_event(
        &self,
        id: i64,
        request: &CreateEventRequest,
        token: &str,
    ) -> Result<Event, ApiError> {
        debug!("Updating event {id}: {}", request.title);
        let builder = self
            .http
            .patch(self.url(&format!("/api/v1/events/{id}")))
            .json(request)
            .bearer_auth(token);
        let response = self.send(builder).await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn delete_event(&self, id: i64, token: &str) -> Result<(), ApiError> {
        debug!("Deleting event {id}");
        let request = self
            .http
            .delete(self.url(&format!("/api/v1/events/{id}")))
            .bearer_auth(token);
        let response = self.send(request).await?;
        self.check(response).await?;
        Ok(())
    }

    async fn generate_upload_url(
        &self,
        request: &GenerateUploadUrlRequest,
        token: &str,
    ) -> Result<GenerateUploadUrlResponse, ApiError> {
        debug!("Requesting upload target for: {}", request.file_name);
        self.post_json("/api/v1/files/generate-upload-url", request, Some(token))
            .await
    }

    async fn confirm_upload(
        &self,
        request: &ConfirmUploadRequest,
        token: &str,
    ) -> Result<ConfirmUploadResponse, ApiError> {
        debug!("Confirming upload for: {}", request.file_name);
        self.post_json("/api/v1/files/confirm-upload", request, Some(token))
            .await
    }

    async fn submit_registration(
        &self,
        registration: &RegistrationRequest,
        token: &str,
    ) -> Result<(), ApiError> {
        debug!("Submitting registration for event {}", registration.event_id);
        let builder = self
            .http
            .post(self.url(&format!(
                "/api/v1/events/{}/registrations",
                registration.event_id
            )))
            .json(registration)
            .bearer_auth(token);
        let response = self.send(builder).await?;
        self.check(response).await?;
        Ok(())
    }
}
