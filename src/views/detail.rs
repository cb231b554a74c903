use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{Event, EventFilters};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum DetailState {
    Loading,
    Loaded(Box<Event>),
    NotFound,
}

/// Detail view for a single event, fetched by id.
pub struct EventDetail {
    state: DetailState,
}

impl Default for EventDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDetail {
    pub fn new() -> Self {
        EventDetail {
            state: DetailState::Loading,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn event(&self) -> Option<&Event> {
        match &self.state {
            DetailState::Loaded(event) => Some(event),
            _ => None,
        }
    }

    pub async fn load<A: ApiClient>(&mut self, api: &A, id: i64) -> Result<(), ApiError> {
        self.state = DetailState::Loading;
        let response = api.get_events(&EventFilters::by_id(id)).await?;
        self.state = match response.data.into_iter().next() {
            Some(event) => {
                debug!("Loaded event {id}: {}", event.title);
                DetailState::Loaded(Box::new(event))
            }
            None => {
                debug!("Event {id} not found");
                DetailState::NotFound
            }
        };
        Ok(())
    }
}
