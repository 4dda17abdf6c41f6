use evidencias_core::event::{EventInput, EventPatch, EventStatus, EventType};
use evidencias_core::types::{DbId, Timestamp};

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::Event;

use super::{split_list, track};

/// Editable fields of the event form, as typed by the user.
///
/// Tags and schools are comma separated text; optional text fields are empty
/// strings when blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub event_type: Option<EventType>,
    pub status: EventStatus,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub location: String,
    pub audience: String,
    pub description: String,
    pub tags: String,
    pub schools: String,
}

impl EventForm {
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            event_type: Some(event.event_type),
            status: event.status,
            start_at: Some(event.start_at),
            end_at: event.end_at,
            location: event.location.clone().unwrap_or_default(),
            audience: event.audience.clone().unwrap_or_default(),
            description: event.description.clone().unwrap_or_default(),
            tags: event.tags.join(", "),
            schools: event.schools.join(", "),
        }
    }

    fn required(&self) -> Result<(String, EventType, Timestamp), ClientError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ClientError::required("title"));
        }
        let event_type = self.event_type.ok_or_else(|| ClientError::required("type"))?;
        let start_at = self.start_at.ok_or_else(|| ClientError::required("start_at"))?;
        Ok((title.to_string(), event_type, start_at))
    }

    /// Create payload; blank optional fields are left out.
    pub fn to_input(&self) -> Result<EventInput, ClientError> {
        let (title, event_type, start_at) = self.required()?;
        Ok(EventInput {
            status: self.status,
            end_at: self.end_at,
            location: Some(self.location.clone()),
            audience: Some(self.audience.clone()),
            description: Some(self.description.clone()),
            tags: split_list(&self.tags),
            schools: split_list(&self.schools),
            ..EventInput::new(title, event_type, start_at)
        }
        .normalized())
    }

    /// Update payload carrying every field, so a blanked text field clears
    /// the stored value.
    pub fn to_patch(&self) -> Result<EventPatch, ClientError> {
        let (title, event_type, start_at) = self.required()?;
        Ok(EventPatch {
            title: Some(title),
            event_type: Some(event_type),
            status: Some(self.status),
            start_at: Some(start_at),
            end_at: self.end_at,
            location: Some(self.location.clone()),
            audience: Some(self.audience.clone()),
            description: Some(self.description.clone()),
            tags: Some(split_list(&self.tags)),
            schools: Some(split_list(&self.schools)),
        }
        .normalized())
    }
}

/// Create or edit an event.
#[derive(Debug)]
pub struct EventFormPage {
    client: EvidenciasClient,
    editing: Option<DbId>,
    pub form: EventForm,
    /// The event as last saved by this page.
    pub saved: Option<Event>,
    pub last_error: Option<String>,
}

impl EventFormPage {
    pub fn create(client: EvidenciasClient) -> Self {
        Self {
            client,
            editing: None,
            form: EventForm::default(),
            saved: None,
            last_error: None,
        }
    }

    /// Open the form for an existing event, filled from the server.
    pub async fn edit(client: EvidenciasClient, id: DbId) -> Result<Self, ClientError> {
        let event = client.events().get(id).await?;
        Ok(Self {
            client,
            editing: Some(id),
            form: EventForm::from_event(&event),
            saved: None,
            last_error: None,
        })
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Validate required fields, then create or update. The form is left as
    /// typed whether or not the save succeeds.
    pub async fn submit(&mut self) -> Result<Event, ClientError> {
        let result = match self.editing {
            None => match self.form.to_input() {
                Ok(input) => self.client.events().create(&input).await,
                Err(e) => Err(e),
            },
            Some(id) => match self.form.to_patch() {
                Ok(patch) => self.client.events().update(id, &patch).await,
                Err(e) => Err(e),
            },
        };
        let event = track(&mut self.last_error, result)?;
        self.saved = Some(event.clone());
        Ok(event)
    }
}
