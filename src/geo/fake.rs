use crate::geo::directory::GeoDirectory;
use crate::geo::error::GeoError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

/// In-memory geography for testing, with per-operation failure injection
pub struct FakeGeoDirectory {
    countries: Mutex<Vec<String>>,
    departments: Mutex<HashMap<String, Vec<String>>>,
    cities: Mutex<HashMap<(String, String), Vec<String>>>,
    fail_operations: Mutex<HashSet<String>>,
}

impl Default for FakeGeoDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGeoDirectory {
    pub fn new() -> Self {
        FakeGeoDirectory {
            countries: Mutex::new(Vec::new()),
            departments: Mutex::new(HashMap::new()),
            cities: Mutex::new(HashMap::new()),
            fail_operations: Mutex::new(HashSet::new()),
        }
    }

    /// A small directory with Colombia and Perú populated
    pub fn with_sample_data() -> Self {
        let directory = Self::new();
        directory.add_country("Colombia");
        directory.add_country("Perú");
        directory.add_departments("Colombia", &["Antioquia", "Cundinamarca"]);
        directory.add_departments("Perú", &["Lima"]);
        directory.add_cities("Colombia", "Antioquia", &["Medellín", "Envigado"]);
        directory.add_cities("Colombia", "Cundinamarca", &["Bogotá", "Chía"]);
        directory.add_cities("Perú", "Lima", &["Lima"]);
        directory
    }

    pub fn add_country(&self, country: &str) {
        self.countries.lock().unwrap().push(country.to_string());
    }

    pub fn add_departments(&self, country: &str, departments: &[&str]) {
        self.departments.lock().unwrap().insert(
            country.to_string(),
            departments.iter().map(|d| d.to_string()).collect(),
        );
    }

    pub fn add_cities(&self, country: &str, department: &str, cities: &[&str]) {
        self.cities.lock().unwrap().insert(
            (country.to_string(), department.to_string()),
            cities.iter().map(|c| c.to_string()).collect(),
        );
    }

    /// Make a named operation fail
    pub fn fail_operation(&self, operation: &str) {
        self.fail_operations
            .lock()
            .unwrap()
            .insert(operation.to_string());
    }

    fn check_failure(&self, operation: &str) -> Result<(), GeoError> {
        if self.fail_operations.lock().unwrap().contains(operation) {
            debug!("[FAKE] Simulating failure for operation: {operation}");
            return Err(GeoError::Service(format!(
                "Simulated failure in {operation}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl GeoDirectory for FakeGeoDirectory {
    async fn countries(&self) -> Result<Vec<String>, GeoError> {
        self.check_failure("countries")?;
        Ok(self.countries.lock().unwrap().clone())
    }

    async fn departments(&self, country: &str) -> Result<Vec<String>, GeoError> {
        self.check_failure("departments")?;
        Ok(self
            .departments
            .lock()
            .unwrap()
            .get(country)
            .cloned()
            .unwrap_or_default())
    }

    async fn cities(&self, country: &str, department: &str) -> Result<Vec<String>, GeoError> {
        self.check_failure("cities")?;
        Ok(self
            .cities
            .lock()
            .unwrap()
            .get(&(country.to_string(), department.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
