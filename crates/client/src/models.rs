//! Entities as the API returns them.
//!
//! Request payloads are the `evidencias_core` input types; these are the
//! response side.

use bytes::Bytes;
use evidencias_core::attendance::Attendee;
use evidencias_core::event::{EventStatus, EventType};
use evidencias_core::files::FileKind;
use evidencias_core::roles::UserRole;
use evidencias_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::session::TokenPair;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: EventStatus,
    pub start_at: Timestamp,
    pub end_at: Option<Timestamp>,
    pub location: Option<String>,
    pub audience: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub schools: Vec<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFile {
    pub id: DbId,
    pub event_id: DbId,
    pub kind: FileKind,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: DbId,
    pub event_id: DbId,
    pub person_name: String,
    pub person_role: Option<String>,
    pub school: Option<String>,
    pub present: bool,
    pub created_at: Timestamp,
}

impl Attendee for Attendance {
    fn person_name(&self) -> &str {
        &self.person_name
    }
    fn person_role(&self) -> Option<&str> {
        self.person_role.as_deref()
    }
    fn school(&self) -> Option<&str> {
        self.school.as_deref()
    }
    fn present(&self) -> bool {
        self.present
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNote {
    pub id: DbId,
    pub event_id: DbId,
    pub text: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

impl AuthResponse {
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// `{ "data": ... }` wrapper around resource responses.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
}

/// One file of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}
