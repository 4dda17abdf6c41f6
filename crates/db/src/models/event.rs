//! Event entity model.

use evidencias_core::event::{EventStatus, EventType};
use evidencias_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub start_at: Timestamp,
    pub end_at: Option<Timestamp>,
    pub location: Option<String>,
    pub audience: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub schools: Vec<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
