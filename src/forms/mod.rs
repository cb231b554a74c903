pub mod error;
pub mod event_draft;
pub mod registration;

pub use error::{FormError, ValidationError};
pub use event_draft::EventDraft;
pub use registration::RegistrationForm;
