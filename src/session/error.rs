use thiserror::Error;

/// Errors from session state and credential persistence
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read stored token: {0}")]
    ReadToken(String),

    #[error("Failed to persist token: {0}")]
    WriteToken(String),

    #[error("Failed to clear stored token: {0}")]
    ClearToken(String),

    #[error("Error al obtener la ubicación: {0}")]
    Geolocation(String),
}
