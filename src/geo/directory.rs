use crate::geo::error::GeoError;
use async_trait::async_trait;
use std::sync::Arc;

/// Directory of countries, their departments and their cities, used by the
/// registration form's chained selects. Names are plain strings; the API
/// consuming them stores names, not codes.
#[async_trait]
pub trait GeoDirectory: Send + Sync + 'static {
    async fn countries(&self) -> Result<Vec<String>, GeoError>;

    async fn departments(&self, country: &str) -> Result<Vec<String>, GeoError>;

    async fn cities(&self, country: &str, department: &str) -> Result<Vec<String>, GeoError>;
}

#[async_trait]
impl<T: GeoDirectory + ?Sized> GeoDirectory for Arc<T> {
    async fn countries(&self) -> Result<Vec<String>, GeoError> {
        (**self).countries().await
    }

    async fn departments(&self, country: &str) -> Result<Vec<String>, GeoError> {
        (**self).departments(country).await
    }

    async fn cities(&self, country: &str, department: &str) -> Result<Vec<String>, GeoError> {
        (**self).cities(country, department).await
    }
}
