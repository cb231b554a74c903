use crate::api::error::ApiError;
use thiserror::Error;

/// Validation failures raised before a form payload is built
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("El campo {0} es obligatorio")]
    MissingField(&'static str),

    #[error("Fecha inválida: {0}")]
    InvalidDate(String),

    #[error("Hora inválida: {0}")]
    InvalidTime(String),

    #[error("Debes seleccionar una talla de camiseta")]
    MissingTshirtSize,

    #[error("Debes aceptar los términos y condiciones del organizador")]
    OrganizerTermsNotAccepted,

    #[error("Debes aceptar los términos y condiciones y la política de privacidad")]
    PlatformTermsNotAccepted,
}

/// Errors surfaced by form submission
#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Debes iniciar sesión para continuar")]
    NotLoggedIn,

    #[error(transparent)]
    Api(#[from] ApiError),
}
