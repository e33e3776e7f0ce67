//! Contact directory service.
//!
//! Orchestrates validation, id assignment and the storage call for each
//! operation, and translates every failure into [`ContactError`]. Each call
//! makes a single attempt; nothing is retried here.

use crate::contact::{
    validate, validate_fields, Contact, ContactError, ContactId, ContactInput, ContactPatch,
    DuplicatePolicy, IdGenerator, StorageError, Validated,
};
use crate::storage::ContactStore;
use crate::utils::now_iso;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Result of a create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new record was inserted.
    Created(Contact),
    /// The name already existed and the merge policy updated its number.
    Merged(Contact),
}

impl CreateOutcome {
    #[must_use]
    pub fn contact(&self) -> &Contact {
        match self {
            Self::Created(contact) | Self::Merged(contact) => contact,
        }
    }

    #[must_use]
    pub fn into_contact(self) -> Contact {
        match self {
            Self::Created(contact) | Self::Merged(contact) => contact,
        }
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Record count plus the time it was taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryInfo {
    pub count: usize,
    pub generated_at: String,
}

/// The directory of contacts over one storage backend.
pub struct ContactDirectory {
    store: Arc<dyn ContactStore>,
    ids: IdGenerator,
    policy: DuplicatePolicy,
    /// Held for the snapshot-validate-write window of mutating operations.
    write_gate: Mutex<()>,
}

impl std::fmt::Debug for ContactDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactDirectory")
            .field("strategy", &self.ids.strategy())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ContactDirectory {
    /// Build a directory over `store`, using the id strategy the store
    /// declares.
    #[must_use]
    pub fn new(store: Arc<dyn ContactStore>, policy: DuplicatePolicy) -> Self {
        let ids = IdGenerator::new(store.id_strategy());
        Self {
            store,
            ids,
            policy,
            write_gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub async fn list(&self) -> Result<Vec<Contact>, ContactError> {
        self.store.list().await.map_err(|e| storage_failure("list", e))
    }

    pub async fn get(&self, id: &ContactId) -> Result<Contact, ContactError> {
        self.store
            .get(id)
            .await
            .map_err(|e| storage_failure("get", e))?
            .ok_or_else(|| ContactError::NotFound(id.to_string()))
    }

    /// Validate `input` against the current directory and insert it, or
    /// merge it into the existing record under [`DuplicatePolicy::Merge`].
    pub async fn create(&self, input: ContactInput) -> Result<CreateOutcome, ContactError> {
        let _gate = self.write_gate.lock().await;

        let existing = self
            .store
            .list()
            .await
            .map_err(|e| storage_failure("create", e))?;

        match validate(&input, &existing, self.policy)? {
            Validated::Fresh(fields) => {
                let contact = Contact {
                    id: self.ids.next_id(&existing),
                    name: fields.name,
                    number: fields.number,
                };
                let stored = self
                    .store
                    .insert(contact)
                    .await
                    .map_err(|e| storage_failure("create", e))?;
                info!("Created contact: {}", stored.id);
                Ok(CreateOutcome::Created(stored))
            }
            Validated::Duplicate {
                existing_id,
                fields,
            } => {
                let merged = self
                    .store
                    .replace(
                        &existing_id,
                        ContactPatch {
                            number: fields.number,
                        },
                    )
                    .await
                    .map_err(|e| storage_failure("create", e))?
                    .ok_or_else(|| ContactError::NotFound(existing_id.to_string()))?;
                info!("Merged duplicate name into contact: {}", merged.id);
                Ok(CreateOutcome::Merged(merged))
            }
        }
    }

    /// Replace the number of an existing contact. The submitted name is
    /// validated but never applied: `id` and `name` are immutable.
    pub async fn update(&self, id: &ContactId, input: ContactInput) -> Result<Contact, ContactError> {
        let _gate = self.write_gate.lock().await;

        if self
            .store
            .get(id)
            .await
            .map_err(|e| storage_failure("update", e))?
            .is_none()
        {
            return Err(ContactError::NotFound(id.to_string()));
        }

        let fields = validate_fields(&input)?;

        let updated = self
            .store
            .replace(
                id,
                ContactPatch {
                    number: fields.number,
                },
            )
            .await
            .map_err(|e| storage_failure("update", e))?
            .ok_or_else(|| ContactError::NotFound(id.to_string()))?;

        info!("Updated contact: {}", id);
        Ok(updated)
    }

    /// Remove a contact. Deleting an absent id is `NotFound`.
    pub async fn delete(&self, id: &ContactId) -> Result<(), ContactError> {
        let _gate = self.write_gate.lock().await;

        let removed = self
            .store
            .delete(id)
            .await
            .map_err(|e| storage_failure("delete", e))?;
        if !removed {
            return Err(ContactError::NotFound(id.to_string()));
        }

        info!("Deleted contact: {}", id);
        Ok(())
    }

    pub async fn info(&self) -> Result<DirectoryInfo, ContactError> {
        let count = self
            .store
            .count()
            .await
            .map_err(|e| storage_failure("info", e))?;
        Ok(DirectoryInfo {
            count,
            generated_at: now_iso(),
        })
    }
}

/// Translate a storage failure, logging the operational ones.
fn storage_failure(operation: &str, err: StorageError) -> ContactError {
    let translated = ContactError::from(err);
    match &translated {
        ContactError::StorageUnavailable(source) => {
            error!(operation, "Contact storage unavailable: {source}");
        }
        ContactError::MalformedId(id) => {
            warn!(operation, "Malformed contact id: {id}");
        }
        ContactError::MissingField(_)
        | ContactError::MalformedNumber(_)
        | ContactError::DuplicateName(_)
        | ContactError::NotFound(_) => {}
    }
    translated
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
#[path = "directory_tests.rs"]
mod directory_tests;
