use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::UserProfile;
use crate::session::error::SessionError;
use crate::session::geolocator::{Geolocator, Position};
use crate::session::token::TokenStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Label attached to the device's own position.
pub const CURRENT_LOCATION_LABEL: &str = "Ubicación actual";

/// A position with a display name; either the device's own location or a
/// city the user selected.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPosition {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    logged: bool,
    user: Option<UserProfile>,
    location: Option<NamedPosition>,
}

/// Application-wide session state: bearer token, logged flag, resolved user
/// profile and last known device location. All mutation goes through the
/// setters here with last-write-wins semantics.
pub struct Session {
    token_store: Arc<dyn TokenStore>,
    geolocator: Arc<dyn Geolocator>,
    state: Mutex<SessionState>,
}

impl Session {
    /// Initialize the session; `logged` is derived from the presence of a
    /// persisted token.
    pub async fn init(
        token_store: Arc<dyn TokenStore>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Result<Self, SessionError> {
        let token = token_store.load().await?;
        let logged = token.is_some();
        if logged {
            debug!("Session initialized from persisted token");
        } else {
            debug!("Session initialized without credentials");
        }
        Ok(Session {
            token_store,
            geolocator,
            state: Mutex::new(SessionState {
                token,
                logged,
                user: None,
                location: None,
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state poisoned")
    }

    pub fn is_logged(&self) -> bool {
        self.state().logged
    }

    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().user.clone()
    }

    pub fn location(&self) -> Option<NamedPosition> {
        self.state().location.clone()
    }

    /// Persist a fresh token and mark the session logged in.
    pub async fn login(&self, token: &str) -> Result<(), SessionError> {
        self.token_store.save(token).await?;
        let mut state = self.state();
        state.token = Some(token.to_string());
        state.logged = true;
        info!("Session logged in");
        Ok(())
    }

    /// Clear the persisted token and all in-memory session state.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.token_store.clear().await?;
        let mut state = self.state();
        state.token = None;
        state.logged = false;
        state.user = None;
        info!("Session logged out");
        Ok(())
    }

    /// Fetch the user profile once logged in. A failed fetch leaves the
    /// profile unset without surfacing an error; a 401 additionally drops
    /// the logged flag since the stored credential is gone.
    pub async fn refresh_user<A: ApiClient>(&self, api: &A) {
        let token = {
            let state = self.state();
            if !state.logged {
                return;
            }
            state.token.clone()
        };
        let Some(token) = token else {
            return;
        };

        match api.current_user(&token).await {
            Ok(user) => {
                debug!("Resolved user profile: {}", user.email);
                self.state().user = Some(user);
            }
            Err(ApiError::Unauthorized) => {
                warn!("Stored credentials rejected while fetching profile");
                let mut state = self.state();
                state.token = None;
                state.logged = false;
                state.user = None;
            }
            Err(e) => {
                debug!("Failed to fetch user profile: {e}");
            }
        }
    }

    /// Resolve the device position once per session. Subsequent calls are
    /// no-ops returning the cached value; a failed resolution leaves the
    /// location unset.
    pub async fn request_location(&self) -> Option<NamedPosition> {
        if let Some(cached) = self.location() {
            return Some(cached);
        }

        match self.geolocator.current_position().await {
            Ok(Position {
                latitude,
                longitude,
            }) => {
                let position = NamedPosition {
                    name: CURRENT_LOCATION_LABEL.to_string(),
                    latitude,
                    longitude,
                };
                info!("Resolved device position: {latitude}, {longitude}");
                self.state().location = Some(position.clone());
                Some(position)
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }
}
