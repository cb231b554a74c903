pub mod detail;
pub mod listing;

pub use detail::{DetailState, EventDetail};
pub use listing::{EventListing, ListingFilters, LoadState};

#[cfg(test)]
mod tests;
