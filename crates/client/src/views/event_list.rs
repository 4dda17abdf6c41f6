use evidencias_core::event::EventFilter;
use evidencias_core::types::DbId;

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::Event;

use super::track;

/// The dashboard: a filtered list of events.
#[derive(Debug)]
pub struct EventListPage {
    client: EvidenciasClient,
    pub filter: EventFilter,
    pub events: Vec<Event>,
    pub last_error: Option<String>,
}

impl EventListPage {
    pub fn new(client: EvidenciasClient) -> Self {
        Self {
            client,
            filter: EventFilter::default(),
            events: Vec::new(),
            last_error: None,
        }
    }

    /// Fetch the list for the current filter.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self.client.events().list(&self.filter).await;
        let events = track(&mut self.last_error, result)?;
        self.events = events;
        Ok(())
    }

    /// Replace the filter and fetch again.
    pub async fn apply_filter(&mut self, filter: EventFilter) -> Result<(), ClientError> {
        self.filter = filter;
        self.load().await
    }

    /// Delete an event; on success it is dropped from the list.
    pub async fn delete(&mut self, id: DbId) -> Result<(), ClientError> {
        let result = self.client.events().delete(id).await;
        track(&mut self.last_error, result)?;
        self.events.retain(|e| e.id != id);
        Ok(())
    }
}
