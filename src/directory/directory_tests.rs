use super::*;
use crate::contact::{sample_contacts, Field, IdStrategy};
use crate::storage::MemoryStore;
use async_trait::async_trait;

fn directory_with(contacts: Vec<Contact>, policy: DuplicatePolicy) -> ContactDirectory {
    ContactDirectory::new(Arc::new(MemoryStore::with_contacts(contacts)), policy)
}

/// A backend whose medium is always unreachable.
struct UnreachableStore;

fn unreachable() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::NotConnected,
        "backend unreachable",
    ))
}

#[async_trait]
impl ContactStore for UnreachableStore {
    fn id_strategy(&self) -> IdStrategy {
        IdStrategy::Sequential
    }

    async fn list(&self) -> Result<Vec<Contact>, StorageError> {
        Err(unreachable())
    }

    async fn get(&self, _id: &ContactId) -> Result<Option<Contact>, StorageError> {
        Err(unreachable())
    }

    async fn insert(&self, _contact: Contact) -> Result<Contact, StorageError> {
        Err(unreachable())
    }

    async fn replace(
        &self,
        _id: &ContactId,
        _patch: ContactPatch,
    ) -> Result<Option<Contact>, StorageError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: &ContactId) -> Result<bool, StorageError> {
        Err(unreachable())
    }
}

#[tokio::test]
async fn test_create_on_empty_directory_assigns_base_id() {
    let directory = directory_with(Vec::new(), DuplicatePolicy::Reject);

    let outcome = directory
        .create(ContactInput::new("Arto Hellas", "040-123456"))
        .await
        .unwrap();

    assert!(!outcome.is_merged());
    assert_eq!(outcome.contact().id.as_str(), "1");
    assert_eq!(directory.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_then_get_returns_input_plus_id() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);

    let created = directory
        .create(ContactInput::new("Grace Hopper", "(09) 123 4567"))
        .await
        .unwrap()
        .into_contact();
    let fetched = directory.get(&created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Grace Hopper");
    assert_eq!(fetched.number, "(09) 123 4567");
    assert_eq!(fetched.id.as_str(), "5");
}

#[tokio::test]
async fn test_create_missing_field_does_not_mutate() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);

    let err = directory
        .create(ContactInput::new("", "040-123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, ContactError::MissingField(Field::Name)));

    let err = directory
        .create(ContactInput::new("Grace Hopper", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, ContactError::MissingField(Field::Number)));

    assert_eq!(directory.list().await.unwrap(), sample_contacts());
}

#[tokio::test]
async fn test_create_malformed_number() {
    let directory = directory_with(Vec::new(), DuplicatePolicy::Reject);

    let err = directory
        .create(ContactInput::new("Arto Hellas", "abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, ContactError::MalformedNumber(n) if n == "abc"));
    assert!(directory.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let existing = vec![Contact {
        id: ContactId::from("1"),
        name: "Ada Lovelace".to_string(),
        number: "39-44-5323523".to_string(),
    }];
    let directory = directory_with(existing.clone(), DuplicatePolicy::Reject);

    let err = directory
        .create(ContactInput::new("Ada Lovelace", "000-0000"))
        .await
        .unwrap_err();

    assert!(matches!(err, ContactError::DuplicateName(_)));
    assert_eq!(directory.list().await.unwrap(), existing);
}

#[tokio::test]
async fn test_duplicate_name_merged() {
    let existing = vec![Contact {
        id: ContactId::from("1"),
        name: "Ada Lovelace".to_string(),
        number: "39-44-5323523".to_string(),
    }];
    let directory = directory_with(existing, DuplicatePolicy::Merge);

    let outcome = directory
        .create(ContactInput::new("Ada Lovelace", "000-0000"))
        .await
        .unwrap();

    assert!(outcome.is_merged());
    assert_eq!(outcome.contact().id.as_str(), "1");
    let stored = directory.get(&ContactId::from("1")).await.unwrap();
    assert_eq!(stored.number, "000-0000");
    assert_eq!(directory.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_absent_is_not_found() {
    let directory = directory_with(Vec::new(), DuplicatePolicy::Reject);
    let err = directory.get(&ContactId::from("9")).await.unwrap_err();
    assert!(matches!(err, ContactError::NotFound(id) if id == "9"));
}

#[tokio::test]
async fn test_update_changes_only_number() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);

    let updated = directory
        .update(
            &ContactId::from("3"),
            ContactInput::new("Someone Else", "000-0000"),
        )
        .await
        .unwrap();

    assert_eq!(updated.id.as_str(), "3");
    assert_eq!(updated.name, "Dan Abramov");
    assert_eq!(updated.number, "000-0000");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);
    let err = directory
        .update(&ContactId::from("99"), ContactInput::new("X", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ContactError::NotFound(_)));
}

#[tokio::test]
async fn test_update_validates_fields() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);

    let err = directory
        .update(&ContactId::from("1"), ContactInput::new("Arto Hellas", "abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, ContactError::MalformedNumber(_)));

    // Same name as its own record is not a duplicate
    let updated = directory
        .update(
            &ContactId::from("1"),
            ContactInput::new("Arto Hellas", "040-654321"),
        )
        .await
        .unwrap();
    assert_eq!(updated.number, "040-654321");
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);
    let id = ContactId::from("2");

    directory.delete(&id).await.unwrap();
    assert!(matches!(
        directory.get(&id).await,
        Err(ContactError::NotFound(_))
    ));
    assert!(matches!(
        directory.delete(&id).await,
        Err(ContactError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_ids_not_reused_after_delete() {
    let directory = directory_with(Vec::new(), DuplicatePolicy::Reject);

    let first = directory
        .create(ContactInput::new("Arto Hellas", "040-123456"))
        .await
        .unwrap()
        .into_contact();
    directory.delete(&first.id).await.unwrap();
    let second = directory
        .create(ContactInput::new("Ada Lovelace", "39-44-5323523"))
        .await
        .unwrap()
        .into_contact();

    assert_ne!(first.id, second.id);
    assert_eq!(second.id.as_str(), "2");
}

#[tokio::test]
async fn test_concurrent_creates_with_same_name_yield_one_record() {
    let directory = Arc::new(directory_with(Vec::new(), DuplicatePolicy::Reject));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let directory = directory.clone();
        handles.push(tokio::spawn(async move {
            directory
                .create(ContactInput::new("Arto Hellas", "040-123456"))
                .await
        }));
    }

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(ContactError::DuplicateName(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(directory.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_ids_are_unique() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);
    for i in 0..10 {
        directory
            .create(ContactInput::new(format!("Person {i}"), "040-123456"))
            .await
            .unwrap();
    }

    let contacts = directory.list().await.unwrap();
    let ids: std::collections::HashSet<_> = contacts.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), contacts.len());
}

#[tokio::test]
async fn test_info_counts_records() {
    let directory = directory_with(sample_contacts(), DuplicatePolicy::Reject);
    let info = directory.info().await.unwrap();
    assert_eq!(info.count, 4);
    assert!(chrono::DateTime::parse_from_rfc3339(&info.generated_at).is_ok());
}

#[tokio::test]
async fn test_storage_failures_surface_as_unavailable() {
    let directory = ContactDirectory::new(Arc::new(UnreachableStore), DuplicatePolicy::Reject);

    assert!(matches!(
        directory.list().await,
        Err(ContactError::StorageUnavailable(_))
    ));
    assert!(matches!(
        directory.get(&ContactId::from("1")).await,
        Err(ContactError::StorageUnavailable(_))
    ));
    assert!(matches!(
        directory
            .create(ContactInput::new("Arto Hellas", "040-123456"))
            .await,
        Err(ContactError::StorageUnavailable(_))
    ));
    assert!(matches!(
        directory.delete(&ContactId::from("1")).await,
        Err(ContactError::StorageUnavailable(_))
    ));
    assert!(matches!(
        directory.info().await,
        Err(ContactError::StorageUnavailable(_))
    ));
}
