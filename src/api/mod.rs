pub mod client;
pub mod error;
pub mod fake;
pub mod http;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use http::HttpApiClient;

#[cfg(test)]
mod tests;
