//! Format and uniqueness rules for candidate contacts.

use super::error::{Field, Rejection};
use super::types::{Contact, ContactId, ContactInput};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Digit groups separated by `-`, `.` or whitespace, with an optional
/// parenthesized area code in front.
#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
pub static PHONE_NUMBER_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(?:\(\d+\)[\s.-]?)?\d+(?:[\s.-]\d+)*$")
        .expect("PHONE_NUMBER_REGEX is a valid regex literal")
});

/// What a create does when the name is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateName`.
    #[default]
    Reject,
    /// Replace the existing record's number.
    Merge,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Merge => f.write_str("merge"),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "merge" => Ok(Self::Merge),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected 'reject' or 'merge')"
            )),
        }
    }
}

/// A candidate with trimmed fields that passed the field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    pub name: String,
    pub number: String,
}

/// Outcome of a successful create validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    /// No contact carries this name yet.
    Fresh(ValidFields),
    /// The name belongs to `existing_id` and the policy is merge.
    Duplicate {
        existing_id: ContactId,
        fields: ValidFields,
    },
}

/// Check the field-level rules only: presence and number shape.
pub fn validate_fields(candidate: &ContactInput) -> Result<ValidFields, Rejection> {
    let name = candidate.name.trim();
    if name.is_empty() {
        return Err(Rejection::MissingField(Field::Name));
    }

    let number = candidate.number.trim();
    if number.is_empty() {
        return Err(Rejection::MissingField(Field::Number));
    }

    if !PHONE_NUMBER_REGEX.is_match(number) {
        return Err(Rejection::MalformedNumber(number.to_string()));
    }

    Ok(ValidFields {
        name: name.to_string(),
        number: number.to_string(),
    })
}

/// Validate a create candidate against a snapshot of the directory.
pub fn validate(
    candidate: &ContactInput,
    existing: &[Contact],
    policy: DuplicatePolicy,
) -> Result<Validated, Rejection> {
    let fields = validate_fields(candidate)?;

    match (find_by_name(existing, &fields.name), policy) {
        (None, _) => Ok(Validated::Fresh(fields)),
        (Some(owner), DuplicatePolicy::Merge) => Ok(Validated::Duplicate {
            existing_id: owner.id.clone(),
            fields,
        }),
        (Some(owner), DuplicatePolicy::Reject) => Err(Rejection::DuplicateName(owner.name.clone())),
    }
}

/// Find a contact whose name matches case-insensitively.
pub fn find_by_name<'a>(contacts: &'a [Contact], name: &str) -> Option<&'a Contact> {
    contacts.iter().find(|c| c.has_name(name))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
#[path = "validation_tests.rs"]
mod validation_tests;
