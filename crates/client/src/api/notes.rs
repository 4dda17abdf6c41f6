use evidencias_core::notes::NoteInput;
use evidencias_core::types::DbId;

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::EventNote;

pub struct NotesApi<'a> {
    client: &'a EvidenciasClient,
}

fn checked(text: &str) -> Result<NoteInput, ClientError> {
    let input = NoteInput::new(text).normalized();
    if input.text.is_empty() {
        return Err(ClientError::required("text"));
    }
    Ok(input)
}

impl<'a> NotesApi<'a> {
    pub(crate) fn new(client: &'a EvidenciasClient) -> Self {
        Self { client }
    }

    /// Notes of an event, newest first.
    pub async fn list(&self, event_id: DbId) -> Result<Vec<EventNote>, ClientError> {
        self.client
            .get_data(&format!("/events/{event_id}/notes"))
            .await
    }

    pub async fn create(&self, event_id: DbId, text: &str) -> Result<EventNote, ClientError> {
        let input = checked(text)?;
        self.client
            .post_data(&format!("/events/{event_id}/notes"), &input)
            .await
    }

    pub async fn update(&self, event_id: DbId, note_id: DbId, text: &str) -> Result<EventNote, ClientError> {
        let input = checked(text)?;
        self.client
            .put_data(&format!("/events/{event_id}/notes/{note_id}"), &input)
            .await
    }

    pub async fn delete(&self, event_id: DbId, note_id: DbId) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/events/{event_id}/notes/{note_id}"))
            .await
    }
}
