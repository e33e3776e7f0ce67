//! Error taxonomy for the contact directory.
//!
//! Storage backends fail with [`StorageError`]; the validation layer fails
//! with [`Rejection`]. Both are folded into the closed [`ContactError`]
//! taxonomy that the HTTP boundary renders.

use std::fmt;
use thiserror::Error;

/// Contact field named in a [`Rejection::MissingField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Number,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Number => f.write_str("number"),
        }
    }
}

/// Why a candidate contact failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{0} missing")]
    MissingField(Field),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("name '{0}' must be unique")]
    DuplicateName(String),
}

/// Failures raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unique index violated for name '{0}'")]
    DuplicateKey(String),

    #[error("Id '{0}' is not a valid object id")]
    MalformedId(String),
}

/// Contact directory errors
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0} missing")]
    MissingField(Field),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("name '{0}' must be unique")]
    DuplicateName(String),

    #[error("Contact '{0}' not found")]
    NotFound(String),

    #[error("malformatted id '{0}'")]
    MalformedId(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),
}

impl ContactError {
    /// Whether the failure was caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<Rejection> for ContactError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::MissingField(field) => Self::MissingField(field),
            Rejection::MalformedNumber(number) => Self::MalformedNumber(number),
            Rejection::DuplicateName(name) => Self::DuplicateName(name),
        }
    }
}

impl From<StorageError> for ContactError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateKey(name) => Self::DuplicateName(name),
            StorageError::MalformedId(id) => Self::MalformedId(id),
            other @ (StorageError::Io(_) | StorageError::Json(_)) => {
                Self::StorageUnavailable(other)
            }
        }
    }
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
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::MissingField(Field::Name).to_string(),
            "name missing"
        );
        assert_eq!(
            Rejection::DuplicateName("Ada".to_string()).to_string(),
            "name 'Ada' must be unique"
        );
    }

    #[test]
    fn test_rejection_maps_one_to_one() {
        assert!(matches!(
            ContactError::from(Rejection::MissingField(Field::Number)),
            ContactError::MissingField(Field::Number)
        ));
        assert!(matches!(
            ContactError::from(Rejection::MalformedNumber("abc".to_string())),
            ContactError::MalformedNumber(n) if n == "abc"
        ));
    }

    #[test]
    fn test_duplicate_key_becomes_duplicate_name() {
        let err = ContactError::from(StorageError::DuplicateKey("Ada".to_string()));
        assert!(matches!(err, ContactError::DuplicateName(name) if name == "Ada"));
    }

    #[test]
    fn test_malformed_id_passes_through() {
        let err = ContactError::from(StorageError::MalformedId("xyz".to_string()));
        assert!(matches!(err, ContactError::MalformedId(id) if id == "xyz"));
        assert!(ContactError::MalformedId("xyz".to_string()).is_client_error());
    }

    #[test]
    fn test_io_failure_is_storage_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ContactError::from(StorageError::from(io));
        assert!(matches!(err, ContactError::StorageUnavailable(_)));
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("read-only"));
    }
}
