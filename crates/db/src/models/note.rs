//! Event note model.

use evidencias_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventNote {
    pub id: DbId,
    pub event_id: DbId,
    pub text: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
