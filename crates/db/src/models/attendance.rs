//! Attendance entity model.

use evidencias_core::attendance::Attendee;
use evidencias_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attendance` table.
#[derive(Debug, Clone, FromRow, Serialize)]
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
