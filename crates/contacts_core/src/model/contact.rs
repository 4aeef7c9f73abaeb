//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical record for a named email contact.
//! - Provide validated constructors so invalid contacts never exist.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another contact.
//! - `name` is never empty.
//! - `email` satisfies [`is_valid_email`].
//! - `section_index` is the uppercased first character of `name`.

use crate::model::email::is_valid_email;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable storage identifier for a contact.
pub type ContactId = Uuid;

/// Validation failures for contact creation and persisted-state checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
    InvalidEmail(String),
    SectionIndexMismatch { expected: String, actual: String },
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::InvalidEmail(email) => write!(f, "invalid email address `{email}`"),
            Self::SectionIndexMismatch { expected, actual } => write!(
                f,
                "section_index `{actual}` does not match name initial `{expected}`"
            ),
        }
    }
}

impl Error for ContactValidationError {}

/// Canonical contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable ID used for deletion and storage mapping.
    pub uuid: ContactId,
    /// Display name. Never empty.
    pub name: String,
    /// Email address accepted by [`is_valid_email`].
    pub email: String,
    /// Section key cached at creation time.
    pub section_index: String,
    /// Creation time in Unix epoch milliseconds.
    pub created_at: i64,
}

impl Contact {
    /// Creates a validated contact with a generated ID and the current time.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty.
    /// - `InvalidEmail` when `email` fails the email-validity predicate.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ContactValidationError> {
        Self::with_id(Uuid::new_v4(), name, email, now_epoch_ms())
    }

    /// Creates a validated contact with caller-provided identity and timestamp.
    ///
    /// Used by storage read paths and tests where identity already exists.
    pub fn with_id(
        uuid: ContactId,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ContactValidationError> {
        let name = name.into();
        let contact = Self {
            uuid,
            section_index: section_index_for(&name),
            name,
            email: email.into(),
            created_at,
        };
        contact.validate()?;
        Ok(contact)
    }

    /// Checks name, email and cached section key.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if !is_valid_email(&self.email) {
            return Err(ContactValidationError::InvalidEmail(self.email.clone()));
        }

        let expected = section_index_for(&self.name);
        if self.section_index != expected {
            return Err(ContactValidationError::SectionIndexMismatch {
                expected,
                actual: self.section_index.clone(),
            });
        }

        Ok(())
    }
}

/// Returns the uppercased first character of `name`, or an empty string.
///
/// Uppercasing may expand one character into several (`ß` -> `SS`).
pub fn section_index_for(name: &str) -> String {
    name.chars()
        .next()
        .map(|first| first.to_uppercase().collect())
        .unwrap_or_default()
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::section_index_for;

    #[test]
    fn section_index_uppercases_first_character() {
        assert_eq!(section_index_for("alice"), "A");
        assert_eq!(section_index_for("Bob"), "B");
        assert_eq!(section_index_for("émile"), "É");
    }

    #[test]
    fn section_index_of_empty_name_is_empty() {
        assert_eq!(section_index_for(""), "");
    }

    #[test]
    fn section_index_may_expand() {
        assert_eq!(section_index_for("ßeta"), "SS");
    }
}
