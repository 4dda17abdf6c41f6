//! Events: the recorded institutional activities evidence is attached to.
//!
//! Provides the type/status enums, the create payload ([`EventInput`]), the
//! partial-update payload ([`EventPatch`]) and the list filter
//! ([`EventFilter`]) together with their normalisation and validation rules.

use chrono::SubsecRound;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::{non_blank, normalize_set};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

text_enum! {
    pub enum EventType {
        Formacao => "FORMACAO",
        Premiacao => "PREMIACAO",
        Encontro => "ENCONTRO",
        Outro => "OUTRO",
    }
}

text_enum! {
    pub enum EventStatus {
        Planejado => "PLANEJADO",
        Realizado => "REALIZADO",
        Arquivado => "ARQUIVADO",
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Planejado
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Fields supplied when creating an event. `created_by` is never part of the
/// payload; the server stamps it from the caller's credential.
///
/// Absent optionals are omitted from the serialized JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub status: EventStatus,
    pub start_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schools: Vec<String>,
}

impl EventInput {
    /// Minimal input with only the required fields set.
    pub fn new(title: impl Into<String>, event_type: EventType, start_at: Timestamp) -> Self {
        Self {
            title: title.into(),
            event_type,
            status: EventStatus::default(),
            start_at,
            end_at: None,
            location: None,
            audience: None,
            description: None,
            tags: Vec::new(),
            schools: Vec::new(),
        }
    }

    /// Canonical form: trimmed title, blank optionals dropped, tag and school
    /// sets de-duplicated, dates at stored precision.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            start_at: stored_precision(self.start_at),
            end_at: self.end_at.map(stored_precision),
            location: non_blank(self.location),
            audience: non_blank(self.audience),
            description: non_blank(self.description),
            tags: normalize_set(self.tags),
            schools: normalize_set(self.schools),
            ..self
        }
    }

    /// Field constraints plus the date-range rule.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        validate_date_range(self.start_at, self.end_at)
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Partial update of an event.
///
/// Merge rules:
/// - an absent field leaves the stored value unchanged;
/// - for `location`, `audience` and `description` an empty string clears the
///   stored value;
/// - `tags` / `schools`, when present, replace the whole set;
/// - `end_at` can be set but not cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schools: Option<Vec<String>>,
}

impl EventPatch {
    /// Trim values. Text fields stay `Some("")` so the "clear" intent survives.
    pub fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            title: trim(self.title),
            start_at: self.start_at.map(stored_precision),
            end_at: self.end_at.map(stored_precision),
            location: trim(self.location),
            audience: trim(self.audience),
            description: trim(self.description),
            tags: self.tags.map(normalize_set),
            schools: self.schools.map(normalize_set),
            ..self
        }
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    /// Validate the patch against the event's current dates.
    pub fn check(
        &self,
        current_start: Timestamp,
        current_end: Option<Timestamp>,
    ) -> Result<(), CoreError> {
        self.validate()?;
        let start = self.start_at.unwrap_or(current_start);
        let end = self.end_at.or(current_end);
        validate_date_range(start, end)
    }
}

/// Truncate to microseconds, the resolution of a `timestamptz` column.
pub fn stored_precision(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(6)
}

/// `end_at`, when present, must not precede `start_at`.
pub fn validate_date_range(start_at: Timestamp, end_at: Option<Timestamp>) -> Result<(), CoreError> {
    match end_at {
        Some(end) if end < start_at => Err(CoreError::Validation(
            "end_at must not be earlier than start_at".into(),
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Filter for listing events. Every absent criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    /// Case-insensitive substring of the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Inclusive lower bound on `start_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,
    /// Inclusive upper bound on `start_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,
}

impl EventFilter {
    /// The search term with surrounding whitespace removed, if any remains.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// `ILIKE` pattern for the search term with `%`, `_` and `\` escaped so
    /// the term is matched literally.
    pub fn search_pattern(&self) -> Option<String> {
        self.search_term().map(|term| {
            let mut escaped = String::with_capacity(term.len() + 2);
            escaped.push('%');
            for ch in term.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            escaped.push('%');
            escaped
        })
    }

    /// Whether an event with these attributes passes the filter.
    ///
    /// This is the reference semantics the SQL in the event repository
    /// implements.
    pub fn matches(
        &self,
        event_type: EventType,
        status: EventStatus,
        title: &str,
        start_at: Timestamp,
    ) -> bool {
        if self.event_type.is_some_and(|t| t != event_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != status) {
            return false;
        }
        if self.start_date.is_some_and(|d| start_at < d) {
            return false;
        }
        if self.end_date.is_some_and(|d| start_at > d) {
            return false;
        }
        match self.search_term() {
            Some(term) => title.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}
