use thiserror::Error;

/// Errors from the country/department/city directory
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to reach geography service: {0}")]
    Request(String),

    #[error("Geography service rejected the request: {0}")]
    Service(String),

    #[error("Unexpected response from geography service: {0}")]
    InvalidResponse(String),
}
