//! Document-collection backend.
//!
//! Each contact is one JSON document `<object id>.json` inside the
//! collection directory. Stored documents carry the native `_id` and a `__v`
//! revision counter; [`to_contact`] strips both and presents the public
//! contact shape with `id` set to the hex form of `_id`.

use super::ContactStore;
use crate::contact::{Contact, ContactId, ContactPatch, IdStrategy, ObjectId, StorageError};
use crate::utils::atomic_write;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A contact as stored in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDocument {
    #[serde(rename = "_id")]
    pub object_id: String,
    pub name: String,
    pub number: String,
    #[serde(rename = "__v", default)]
    pub revision: u32,
}

/// Map a stored document to the public contact shape.
#[must_use]
pub fn to_contact(document: PersonDocument) -> Contact {
    Contact {
        id: ContactId::new(document.object_id),
        name: document.name,
        number: document.number,
    }
}

/// Translate a public id into the collection's native id.
fn native_id(id: &ContactId) -> Result<ObjectId, StorageError> {
    ObjectId::parse(id.as_str()).ok_or_else(|| StorageError::MalformedId(id.to_string()))
}

/// A directory of per-contact JSON documents with a unique index on the
/// lowercased name.
#[derive(Debug)]
pub struct DocumentStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open the collection at `dir`, creating the directory if needed.
    pub async fn open(dir: &Path) -> Result<Self, StorageError> {
        if !fs::try_exists(dir).await? {
            fs::create_dir_all(dir).await?;
            info!("Created document collection at {}", dir.display());
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, id: ObjectId) -> PathBuf {
        self.dir.join(format!("{}.json", id.to_hex()))
    }

    async fn read_document(&self, id: ObjectId) -> Result<Option<PersonDocument>, StorageError> {
        match fs::read_to_string(self.document_path(id)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &PersonDocument) -> Result<(), StorageError> {
        let id = ObjectId::parse(&document.object_id)
            .ok_or_else(|| StorageError::MalformedId(document.object_id.clone()))?;
        let content = serde_json::to_string_pretty(document)?;
        atomic_write(&self.document_path(id), &content).await?;
        Ok(())
    }

    /// Every document in the collection, ordered by native id.
    async fn scan(&self) -> Result<Vec<PersonDocument>, StorageError> {
        let mut documents = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let document = serde_json::from_str::<PersonDocument>(&content).map_err(|e| {
                warn!("Unreadable document {}: {}", path.display(), e);
                StorageError::Json(e)
            })?;
            documents.push(document);
        }

        documents.sort_by_key(|d| ObjectId::parse(&d.object_id));
        Ok(documents)
    }
}

#[async_trait]
impl ContactStore for DocumentStore {
    fn id_strategy(&self) -> IdStrategy {
        IdStrategy::ObjectId
    }

    async fn list(&self) -> Result<Vec<Contact>, StorageError> {
        Ok(self.scan().await?.into_iter().map(to_contact).collect())
    }

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, StorageError> {
        let native = native_id(id)?;
        Ok(self.read_document(native).await?.map(to_contact))
    }

    async fn insert(&self, contact: Contact) -> Result<Contact, StorageError> {
        let native = native_id(&contact.id)?;
        let _guard = self.write_lock.lock().await;

        let lowered = contact.name.to_lowercase();
        if self
            .scan()
            .await?
            .iter()
            .any(|d| d.name.to_lowercase() == lowered)
        {
            return Err(StorageError::DuplicateKey(contact.name));
        }

        let document = PersonDocument {
            object_id: native.to_hex(),
            name: contact.name,
            number: contact.number,
            revision: 0,
        };
        self.write_document(&document).await?;
        debug!("Inserted document {}", document.object_id);
        Ok(to_contact(document))
    }

    async fn replace(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, StorageError> {
        let native = native_id(id)?;
        let _guard = self.write_lock.lock().await;

        let Some(mut document) = self.read_document(native).await? else {
            return Ok(None);
        };
        document.number = patch.number;
        document.revision = document.revision.saturating_add(1);
        self.write_document(&document).await?;
        Ok(Some(to_contact(document)))
    }

    async fn delete(&self, id: &ContactId) -> Result<bool, StorageError> {
        let native = native_id(id)?;
        let _guard = self.write_lock.lock().await;

        match fs::remove_file(self.document_path(native)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
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
#[path = "document_tests.rs"]
mod document_tests;
