//! Contact type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Public identifier of a contact.
///
/// Opaque to callers: the in-memory and file backends issue decimal strings,
/// the document backend issues 24-character hex object ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is a decimal integer.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A named phone-number record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

/// Caller-supplied fields for create and update.
///
/// Missing fields deserialize as empty strings so they fail validation with
/// a field error rather than a body parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
}

impl ContactInput {
    #[must_use]
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }
}

/// Fields a replace may change. Only the number is mutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPatch {
    pub number: String,
}

impl Contact {
    /// Apply a patch, keeping `id` and `name`.
    #[must_use]
    pub fn patched(&self, patch: &ContactPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            number: patch.number.clone(),
        }
    }

    /// Case-insensitive name comparison used by the uniqueness rule.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The flat-file document structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactsFile {
    #[serde(default)]
    pub persons: Vec<Contact>,
}

/// The sample phonebook served by a freshly started in-memory directory.
#[must_use]
pub fn sample_contacts() -> Vec<Contact> {
    [
        ("1", "Arto Hellas", "040-123456"),
        ("2", "Ada Lovelace", "39-44-5323523"),
        ("3", "Dan Abramov", "12-43-234345"),
        ("4", "Mary Poppendieck", "39-23-6423122"),
    ]
    .into_iter()
    .map(|(id, name, number)| Contact {
        id: ContactId::from(id),
        name: name.to_string(),
        number: number.to_string(),
    })
    .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_serializes_flat_id() {
        let contact = Contact {
            id: ContactId::from("7"),
            name: "Arto Hellas".to_string(),
            number: "040-123456".to_string(),
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "7", "name": "Arto Hellas", "number": "040-123456"})
        );
    }

    #[test]
    fn test_input_missing_fields_default_to_empty() {
        let input: ContactInput = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(input.name, "Ada");
        assert!(input.number.is_empty());
    }

    #[test]
    fn test_input_ignores_unknown_fields() {
        let input: ContactInput =
            serde_json::from_str(r#"{"name": "Ada", "number": "1", "id": "99"}"#).unwrap();
        assert_eq!(input, ContactInput::new("Ada", "1"));
    }

    #[test]
    fn test_has_name_is_case_insensitive() {
        let contact = sample_contacts().remove(1);
        assert!(contact.has_name("ada lovelace"));
        assert!(contact.has_name("ADA LOVELACE"));
        assert!(!contact.has_name("Ada"));
    }

    #[test]
    fn test_patched_keeps_id_and_name() {
        let contact = sample_contacts().remove(0);
        let patched = contact.patched(&ContactPatch {
            number: "000-0000".to_string(),
        });
        assert_eq!(patched.id, contact.id);
        assert_eq!(patched.name, contact.name);
        assert_eq!(patched.number, "000-0000");
    }

    #[test]
    fn test_contact_id_as_number() {
        assert_eq!(ContactId::from("42").as_number(), Some(42));
        assert_eq!(ContactId::from("65a1f0c2e4b0a1b2c3d4e5f6").as_number(), None);
    }

    #[test]
    fn test_contacts_file_defaults_to_empty() {
        let file: ContactsFile = serde_json::from_str("{}").unwrap();
        assert!(file.persons.is_empty());
    }
}
