//! Storage adapters for the contact directory.
//!
//! Every backend implements [`ContactStore`] with the same contract:
//! absence is `Ok(None)` / `Ok(false)`, never an error, and only a medium
//! that cannot be read or written yields [`StorageError`].

mod document;
mod file;
mod memory;

pub use document::{to_contact, DocumentStore, PersonDocument};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::contact::{Contact, ContactId, ContactPatch, IdStrategy, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Uniform contract over the in-memory, flat-file and document backends.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Id strategy this backend's records are keyed by.
    fn id_strategy(&self) -> IdStrategy;

    /// Full snapshot of the directory.
    async fn list(&self) -> Result<Vec<Contact>, StorageError>;

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, StorageError>;

    /// Append a contact whose id is already assigned.
    async fn insert(&self, contact: Contact) -> Result<Contact, StorageError>;

    /// Persist the merged record, or `None` when `id` is unknown.
    async fn replace(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, StorageError>;

    /// Whether a record was actually removed.
    async fn delete(&self, id: &ContactId) -> Result<bool, StorageError>;

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.list().await?.len())
    }
}

/// Which backend a deployment runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    File,
    Document,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::File => f.write_str("file"),
            Self::Document => f.write_str("document"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "document" => Ok(Self::Document),
            other => Err(format!(
                "unknown backend '{other}' (expected 'memory', 'file' or 'document')"
            )),
        }
    }
}

/// Open the configured backend.
///
/// `data_path` is the JSON document for `File` and the collection directory
/// for `Document`; it is ignored for `Memory`.
pub async fn open_store(
    kind: BackendKind,
    data_path: &Path,
    seed: Vec<Contact>,
) -> Result<Arc<dyn ContactStore>, StorageError> {
    let store: Arc<dyn ContactStore> = match kind {
        BackendKind::Memory => Arc::new(MemoryStore::with_contacts(seed)),
        BackendKind::File => Arc::new(JsonFileStore::open(data_path).await?),
        BackendKind::Document => Arc::new(DocumentStore::open(data_path).await?),
    };
    Ok(store)
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
    fn test_backend_kind_from_str() {
        assert_eq!("memory".parse::<BackendKind>(), Ok(BackendKind::Memory));
        assert_eq!("FILE".parse::<BackendKind>(), Ok(BackendKind::File));
        assert_eq!("document".parse::<BackendKind>(), Ok(BackendKind::Document));
        assert!("mongo".parse::<BackendKind>().is_err());
    }

    #[tokio::test]
    async fn test_open_store_picks_strategy_per_backend() {
        let temp = tempfile::tempdir().unwrap();

        let memory = open_store(BackendKind::Memory, temp.path(), Vec::new())
            .await
            .unwrap();
        assert_eq!(memory.id_strategy(), IdStrategy::Sequential);

        let file = open_store(BackendKind::File, &temp.path().join("db.json"), Vec::new())
            .await
            .unwrap();
        assert_eq!(file.id_strategy(), IdStrategy::Timestamp);

        let document = open_store(BackendKind::Document, &temp.path().join("persons"), Vec::new())
            .await
            .unwrap();
        assert_eq!(document.id_strategy(), IdStrategy::ObjectId);
    }
}
