use thiserror::Error;

/// Errors surfaced by the REST API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered 401. The persisted token has already been
    /// cleared by the time this is returned.
    #[error("Debes iniciar sesión para continuar")]
    Unauthorized,

    /// Non-2xx response; carries the server's structured error message or,
    /// failing that, the HTTP status text.
    #[error("{0}")]
    Api(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The call was abandoned through its cancellation token before a
    /// response arrived.
    #[error("Request cancelled")]
    Cancelled,
}
