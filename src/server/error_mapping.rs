use crate::contact::ContactError;
use axum::extract::rejection::JsonRejection;
use http::StatusCode;

/// Trait for mapping domain errors to structured error codes, optional tips
/// and the HTTP status they are rendered with.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);

    fn status_code(&self) -> StatusCode;
}

// ── ContactError ───────────────────────────────────────────────────────────────
impl ToStructuredError for ContactError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            Self::MissingField(_) => (
                "MISSING_FIELD",
                Some("Provide both a non-empty name and number"),
            ),
            Self::MalformedNumber(_) => (
                "MALFORMED_NUMBER",
                Some("Use digit groups separated by '-', '.' or spaces, e.g. 040-123456"),
            ),
            Self::DuplicateName(_) => ("DUPLICATE_NAME", None),
            Self::NotFound(_) => ("NOT_FOUND", None),
            Self::MalformedId(_) => ("MALFORMED_ID", None),
            Self::StorageUnavailable(_) => (
                "STORAGE_UNAVAILABLE",
                Some("Retry the request after a short delay"),
            ),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_)
            | Self::MalformedNumber(_)
            | Self::DuplicateName(_)
            | Self::MalformedId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// ── JsonRejection ──────────────────────────────────────────────────────────────
impl ToStructuredError for JsonRejection {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", None),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => (
                "UNSUPPORTED_MEDIA_TYPE",
                Some("Send the body with 'Content-Type: application/json'"),
            ),
            _ => ("MALFORMED_BODY", None),
        }
    }

    /// Body-size and content-type failures keep their own status; every other
    /// unreadable body is a plain 400.
    fn status_code(&self) -> StatusCode {
        match self.status() {
            status @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => status,
            _ => StatusCode::BAD_REQUEST,
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
    use crate::contact::{Field, StorageError};

    #[test]
    fn test_field_errors_are_bad_request() {
        for err in [
            ContactError::MissingField(Field::Name),
            ContactError::MalformedNumber("abc".to_string()),
            ContactError::DuplicateName("Ada Lovelace".to_string()),
            ContactError::MalformedId("zzz".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn test_not_found_and_unavailable() {
        let err = ContactError::NotFound("9".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code_and_tip(), ("NOT_FOUND", None));

        let err = ContactError::StorageUnavailable(StorageError::Io(std::io::Error::other(
            "disk full",
        )));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code_and_tip().0, "STORAGE_UNAVAILABLE");
    }

    #[test]
    fn test_malformed_number_has_tip() {
        let err = ContactError::MalformedNumber("abc".to_string());
        let (code, tip) = err.error_code_and_tip();
        assert_eq!(code, "MALFORMED_NUMBER");
        assert!(tip.is_some_and(|t| t.contains("040-123456")));
    }
}
