//! Free-text notes attached to an event.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Longest note accepted, in characters.
pub const MAX_NOTE_LENGTH: u64 = 10_000;

/// Body of a note create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NoteInput {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
}

impl NoteInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Trim surrounding whitespace.
    pub fn normalized(self) -> Self {
        Self {
            text: self.text.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<(), CoreError> {
        if self.text.trim().is_empty() {
            return Err(CoreError::Validation("Note text must not be empty".into()));
        }
        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_note_is_rejected() {
        assert_matches!(NoteInput::new("   ").check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn note_length_is_bounded() {
        let long = "a".repeat(MAX_NOTE_LENGTH as usize + 1);
        assert_matches!(NoteInput::new(long).check(), Err(CoreError::Validation(_)));
        let max = "a".repeat(MAX_NOTE_LENGTH as usize);
        assert!(NoteInput::new(max).check().is_ok());
    }

    #[test]
    fn normalized_trims() {
        assert_eq!(NoteInput::new("  visita ok \n").normalized().text, "visita ok");
    }
}
