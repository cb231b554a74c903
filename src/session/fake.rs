use crate::session::error::SessionError;
use crate::session::geolocator::{Geolocator, Position};
use crate::session::token::TokenStore;
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory token store for testing
pub struct FakeTokenStore {
    token: Mutex<Option<String>>,
    fail_load: Mutex<bool>,
    fail_save: Mutex<bool>,
}

impl Default for FakeTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTokenStore {
    pub fn new() -> Self {
        FakeTokenStore {
            token: Mutex::new(None),
            fail_load: Mutex::new(false),
            fail_save: Mutex::new(false),
        }
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        *store.token.lock().unwrap() = Some(token.to_string());
        store
    }

    /// Make subsequent load calls fail
    pub fn fail_load(&self) {
        *self.fail_load.lock().unwrap() = true;
    }

    /// Make subsequent save calls fail
    pub fn fail_save(&self) {
        *self.fail_save.lock().unwrap() = true;
    }

    /// Current stored token, bypassing failure injection
    pub fn stored(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for FakeTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        if *self.fail_load.lock().unwrap() {
            return Err(SessionError::ReadToken("Simulated load failure".to_string()));
        }
        Ok(self.token.lock().unwrap().clone())
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        if *self.fail_save.lock().unwrap() {
            return Err(SessionError::WriteToken(
                "Simulated save failure".to_string(),
            ));
        }
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

/// Geolocator for testing with controllable position and failure
pub struct FakeGeolocator {
    position: Mutex<Option<Position>>,
    fail: Mutex<bool>,
    calls: Mutex<u32>,
}

impl Default for FakeGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGeolocator {
    pub fn new() -> Self {
        FakeGeolocator {
            position: Mutex::new(None),
            fail: Mutex::new(false),
            calls: Mutex::new(0),
        }
    }

    pub fn with_position(latitude: f64, longitude: f64) -> Self {
        let geolocator = Self::new();
        *geolocator.position.lock().unwrap() = Some(Position {
            latitude,
            longitude,
        });
        geolocator
    }

    /// Make subsequent position requests fail, as a denied permission would
    pub fn deny(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// Number of times a position was requested
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Geolocator for FakeGeolocator {
    async fn current_position(&self) -> Result<Position, SessionError> {
        *self.calls.lock().unwrap() += 1;
        if *self.fail.lock().unwrap() {
            return Err(SessionError::Geolocation(
                "User denied Geolocation".to_string(),
            ));
        }
        self.position
            .lock()
            .unwrap()
            .ok_or_else(|| SessionError::Geolocation("Position unavailable".to_string()))
    }
}
