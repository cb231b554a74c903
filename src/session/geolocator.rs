use crate::session::error::SessionError;
use async_trait::async_trait;
use std::sync::Arc;

/// A resolved device position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of the device's current position. Resolved at most once per
/// session; the session caches the answer.
#[async_trait]
pub trait Geolocator: Send + Sync + 'static {
    async fn current_position(&self) -> Result<Position, SessionError>;
}

#[async_trait]
impl<T: Geolocator + ?Sized> Geolocator for Arc<T> {
    async fn current_position(&self) -> Result<Position, SessionError> {
        (**self).current_position().await
    }
}

/// Geolocator backed by a fixed position from configuration, for
/// environments without positioning hardware. An unconfigured position
/// behaves like a denied geolocation prompt.
pub struct StaticGeolocator {
    position: Option<Position>,
}

impl StaticGeolocator {
    pub fn new(position: Option<[f64; 2]>) -> Self {
        StaticGeolocator {
            position: position.map(|p| Position {
                latitude: p[0],
                longitude: p[1],
            }),
        }
    }
}

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn current_position(&self) -> Result<Position, SessionError> {
        self.position.ok_or_else(|| {
            SessionError::Geolocation("no device position configured".to_string())
        })
    }
}
