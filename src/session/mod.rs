pub mod error;
pub mod fake;
pub mod geolocator;
#[allow(clippy::module_inception)]
pub mod session;
pub mod token;

pub use session::{NamedPosition, Session, CURRENT_LOCATION_LABEL};
pub use token::{FileTokenStore, TokenStore};

#[cfg(test)]
mod tests;
