use evidencias_core::event::{EventFilter, EventInput, EventPatch};
use evidencias_core::types::DbId;

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::Event;

pub struct EventsApi<'a> {
    client: &'a EvidenciasClient,
}

impl<'a> EventsApi<'a> {
    pub(crate) fn new(client: &'a EvidenciasClient) -> Self {
        Self { client }
    }

    /// Events matching `filter`, most recent `start_at` first.
    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, ClientError> {
        self.client.get_data_query("/events", filter).await
    }

    pub async fn get(&self, id: DbId) -> Result<Event, ClientError> {
        self.client.get_data(&format!("/events/{id}")).await
    }

    /// Create an event. Blank optional fields are omitted from the request;
    /// the server stamps `created_by`.
    pub async fn create(&self, input: &EventInput) -> Result<Event, ClientError> {
        let input = input.clone().normalized();
        if input.title.is_empty() {
            return Err(ClientError::required("title"));
        }
        self.client.post_data("/events", &input).await
    }

    /// Apply a partial update; absent fields are left unchanged.
    pub async fn update(&self, id: DbId, patch: &EventPatch) -> Result<Event, ClientError> {
        let patch = patch.clone().normalized();
        if patch.title.as_deref() == Some("") {
            return Err(ClientError::required("title"));
        }
        self.client.put_data(&format!("/events/{id}"), &patch).await
    }

    /// Delete an event together with its files, attendance and notes.
    pub async fn delete(&self, id: DbId) -> Result<(), ClientError> {
        self.client.delete(&format!("/events/{id}")).await
    }
}
