use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{Event, EventFilters, EventType, Location};
use crate::session::session::Session;
use tracing::debug;

/// Listing load lifecycle; `Loading` is the skeleton state shown until the
/// first page resolves.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Vec<Event>),
    Empty,
}

/// Optional filters for the listing. A selected city carries its own
/// coordinates, which take precedence over the device position.
#[derive(Debug, Clone, Default)]
pub struct ListingFilters {
    pub event_type: Option<EventType>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub city: Option<Location>,
}

/// Paginated event listing backed by the remote API. Local deletions and
/// edits are patched in place and reconciled on the next load.
pub struct EventListing {
    limit: u32,
    page: u32,
    total: u64,
    state: LoadState,
}

impl EventListing {
    pub fn new(limit: u32) -> Self {
        EventListing {
            limit,
            page: 1,
            total: 0,
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn events(&self) -> &[Event] {
        match &self.state {
            LoadState::Loaded(events) => events,
            _ => &[],
        }
    }

    /// Fetch a page. The device position is requested at most once per
    /// session; an explicitly selected city wins over it.
    pub async fn load<A: ApiClient>(
        &mut self,
        api: &A,
        session: &Session,
        filters: &ListingFilters,
        page: u32,
    ) -> Result<(), ApiError> {
        self.state = LoadState::Loading;

        let (latitude, longitude) = match &filters.city {
            Some(city) => (Some(city.coordinates[1]), Some(city.coordinates[0])),
            None => match session.request_location().await {
                Some(position) => (Some(position.latitude), Some(position.longitude)),
                None => (None, None),
            },
        };

        let request = EventFilters {
            limit: Some(self.limit),
            page: Some(page),
            latitude,
            longitude,
            year: filters.year,
            month: filters.month,
            event_type: filters.event_type,
            ..Default::default()
        };

        let response = api.get_events(&request).await?;
        debug!(
            "Loaded page {} of events: {} of {}",
            response.page,
            response.data.len(),
            response.total
        );
        self.page = response.page;
        self.total = response.total;
        self.state = if response.data.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Loaded(response.data)
        };
        Ok(())
    }

    /// Remove a deleted event locally without refetching.
    pub fn apply_delete(&mut self, id: i64) {
        if let LoadState::Loaded(events) = &mut self.state {
            events.retain(|event| event.id != Some(id));
            self.total = self.total.saturating_sub(1);
            if events.is_empty() {
                self.state = LoadState::Empty;
            }
        }
    }

    /// Replace an edited event in place without refetching.
    pub fn apply_update(&mut self, updated: &Event) {
        if let LoadState::Loaded(events) = &mut self.state {
            for event in events.iter_mut() {
                if event.id == updated.id {
                    *event = updated.clone();
                }
            }
        }
    }
}
