pub mod directory;
pub mod error;
pub mod fake;
pub mod http;

pub use directory::GeoDirectory;
pub use error::GeoError;
pub use http::HttpGeoDirectory;

#[cfg(test)]
mod tests;
