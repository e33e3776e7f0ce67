//! Flat-file backend: one JSON document holding every contact.
//!
//! Each mutation reads the whole file, applies the change and writes the
//! whole file back through a temp file + rename. Nothing is cached between
//! calls, so a failed write leaves the previous document on disk and the
//! next call sees it.

use super::ContactStore;
use crate::contact::{Contact, ContactId, ContactPatch, ContactsFile, IdStrategy, StorageError};
use crate::utils::atomic_write;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Contacts persisted in a `{"persons": [...]}` JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes the read-modify-write window of mutating calls.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the document at `path`, creating `{"persons": []}` if absent.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        let store = Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        };

        if !fs::try_exists(&store.path).await? {
            if let Some(parent) = store.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await?;
                }
            }
            store.write_document(&ContactsFile::default()).await?;
            info!("Created contacts file at {}", store.path.display());
        }

        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<ContactsFile, StorageError> {
        let content = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_document(&self, document: &ContactsFile) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(document)?;
        // Runs in a blocking task that finishes even if this future is dropped.
        atomic_write(&self.path, &content).await?;
        Ok(())
    }

    /// Read the document, apply `change`, and write it back if it reports a
    /// modification.
    async fn mutate<T, F>(&self, change: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Vec<Contact>) -> (T, bool) + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let (result, changed) = change(&mut document.persons);
        if changed {
            self.write_document(&document).await?;
            debug!("Rewrote {}", self.path.display());
        }
        Ok(result)
    }
}

#[async_trait]
impl ContactStore for JsonFileStore {
    fn id_strategy(&self) -> IdStrategy {
        IdStrategy::Timestamp
    }

    async fn list(&self) -> Result<Vec<Contact>, StorageError> {
        Ok(self.read_document().await?.persons)
    }

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, StorageError> {
        let document = self.read_document().await?;
        Ok(document.persons.into_iter().find(|c| &c.id == id))
    }

    async fn insert(&self, contact: Contact) -> Result<Contact, StorageError> {
        self.mutate(move |persons| {
            persons.push(contact.clone());
            (contact, true)
        })
        .await
    }

    async fn replace(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, StorageError> {
        self.mutate(|persons| match persons.iter_mut().find(|c| &c.id == id) {
            Some(contact) => {
                *contact = contact.patched(&patch);
                (Some(contact.clone()), true)
            }
            None => (None, false),
        })
        .await
    }

    async fn delete(&self, id: &ContactId) -> Result<bool, StorageError> {
        self.mutate(|persons| {
            let before = persons.len();
            persons.retain(|c| &c.id != id);
            let removed = persons.len() != before;
            (removed, removed)
        })
        .await
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
#[path = "file_tests.rs"]
mod file_tests;
