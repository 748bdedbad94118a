//! Message types and form validation.

use serde::{Deserialize, Serialize};

/// Longest message text accepted, in UTF-16 code units.
pub const MAX_MESSAGE_LENGTH: usize = 250;

/// A stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier, never reused
    pub id: u32,

    /// Message body
    pub text: String,
}

/// A message as submitted by the add form, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub text: String,
}

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Name of the offending form field
    pub field: &'static str,

    /// Message shown next to the field
    pub message: String,
}

impl NewMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Checks the form against the message rules.
    ///
    /// Text is required (whitespace alone does not count) and limited to
    /// [`MAX_MESSAGE_LENGTH`] UTF-16 code units, so a character outside the
    /// Basic Multilingual Plane counts twice.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.text.trim().is_empty() {
            errors.push(ValidationError {
                field: "Text",
                message: "The Text field is required.".to_string(),
            });
        } else if self.text.encode_utf16().count() > MAX_MESSAGE_LENGTH {
            errors.push(ValidationError {
                field: "Text",
                message: format!(
                    "There's a {MAX_MESSAGE_LENGTH} character limit on messages. Please shorten your message."
                ),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
