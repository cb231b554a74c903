use crate::geo::directory::GeoDirectory;
use crate::geo::error::GeoError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Envelope every countriesnow.space response uses.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    error: bool,
    msg: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct CountryEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StatesData {
    states: Vec<StateEntry>,
}

#[derive(Debug, Deserialize)]
struct StateEntry {
    name: String,
}

/// Directory backed by the public countriesnow.space service. Every answer
/// is cached; the geography of the world does not change mid-session.
pub struct HttpGeoDirectory {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<Mutex<lru::LruCache<String, Vec<String>>>>,
}

impl HttpGeoDirectory {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        // 1 country list + a department list and its city lists per form
        let cache_size = NonZeroUsize::new(100).unwrap_or(NonZeroUsize::MIN);
        HttpGeoDirectory {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: Arc::new(Mutex::new(lru::LruCache::new(cache_size))),
        }
    }

    async fn cached(&self, key: &str) -> Option<Vec<String>> {
        let mut cache = self.cache.lock().await;
        cache.get(key).cloned()
    }

    async fn store(&self, key: &str, names: Vec<String>) -> Vec<String> {
        let mut cache = self.cache.lock().await;
        cache.put(key.to_string(), names.clone());
        names
    }

    fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, GeoError> {
        if envelope.error {
            return Err(GeoError::Service(envelope.msg));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl GeoDirectory for HttpGeoDirectory {
    async fn countries(&self) -> Result<Vec<String>, GeoError> {
        if let Some(cached) = self.cached("countries").await {
            return Ok(cached);
        }

        debug!("Fetching country list");
        let response = self
            .http
            .get(format!("{}/countries/positions", self.base_url))
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;
        let envelope: Envelope<Vec<CountryEntry>> = response
            .json()
            .await
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))?;

        let names = Self::unwrap_envelope(envelope)?
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        Ok(self.store("countries", names).await)
    }

    async fn departments(&self, country: &str) -> Result<Vec<String>, GeoError> {
        let key = format!("departments:{country}");
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }

        debug!("Fetching departments of {country}");
        let response = self
            .http
            .post(format!("{}/countries/states", self.base_url))
            .json(&json!({ "country": country }))
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;
        let envelope: Envelope<StatesData> = response
            .json()
            .await
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))?;

        let names = Self::unwrap_envelope(envelope)?
            .states
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        Ok(self.store(&key, names).await)
    }

    async fn cities(&self, country: &str, department: &str) -> Result<Vec<String>, GeoError> {
        let key = format!("cities:{country}:{department}");
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }

        debug!("Fetching cities of {department}, {country}");
        let response = self
            .http
            .post(format!("{}/countries/state/cities", self.base_url))
            .json(&json!({ "country": country, "state": department }))
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;
        let envelope: Envelope<Vec<String>> = response
            .json()
            .await
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))?;

        let names = Self::unwrap_envelope(envelope)?;
        Ok(self.store(&key, names).await)
    }
}
