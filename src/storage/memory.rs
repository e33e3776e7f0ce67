//! In-memory contact list.

use super::ContactStore;
use crate::contact::{Contact, ContactId, ContactPatch, IdStrategy, StorageError};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Contacts held in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing list, e.g. the sample phonebook.
    #[must_use]
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: RwLock::new(contacts),
        }
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    fn id_strategy(&self) -> IdStrategy {
        IdStrategy::Sequential
    }

    async fn list(&self) -> Result<Vec<Contact>, StorageError> {
        Ok(self.contacts.read().await.clone())
    }

    async fn get(&self, id: &ContactId) -> Result<Option<Contact>, StorageError> {
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().find(|c| &c.id == id).cloned())
    }

    async fn insert(&self, contact: Contact) -> Result<Contact, StorageError> {
        self.contacts.write().await.push(contact.clone());
        debug!("Inserted contact {} in memory", contact.id);
        Ok(contact)
    }

    async fn replace(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, StorageError> {
        let mut contacts = self.contacts.write().await;
        let Some(contact) = contacts.iter_mut().find(|c| &c.id == id) else {
            return Ok(None);
        };
        *contact = contact.patched(&patch);
        Ok(Some(contact.clone()))
    }

    async fn delete(&self, id: &ContactId) -> Result<bool, StorageError> {
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|c| &c.id != id);
        Ok(contacts.len() != before)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.contacts.read().await.len())
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
    use crate::contact::sample_contacts;

    fn patch(number: &str) -> ContactPatch {
        ContactPatch {
            number: number.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::with_contacts(sample_contacts());
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["Arto Hellas", "Ada Lovelace", "Dan Abramov", "Mary Poppendieck"]
        );
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(&ContactId::from("1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();
        let contact = Contact {
            id: ContactId::from("1"),
            name: "Arto Hellas".to_string(),
            number: "040-123456".to_string(),
        };
        store.insert(contact.clone()).await.unwrap();
        assert_eq!(store.get(&contact.id).await.unwrap(), Some(contact));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_changes_only_number() {
        let store = MemoryStore::with_contacts(sample_contacts());
        let updated = store
            .replace(&ContactId::from("2"), patch("000-0000"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.number, "000-0000");
        assert_eq!(
            store.get(&ContactId::from("2")).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_replace_unknown_is_none() {
        let store = MemoryStore::new();
        let result = store
            .replace(&ContactId::from("9"), patch("1"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::with_contacts(sample_contacts());
        let id = ContactId::from("3");
        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
