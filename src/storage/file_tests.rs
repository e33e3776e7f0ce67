use super::*;
use tempfile::TempDir;

fn contact(id: &str, name: &str, number: &str) -> Contact {
    Contact {
        id: ContactId::from(id),
        name: name.to_string(),
        number: number.to_string(),
    }
}

async fn open_in(temp: &TempDir) -> JsonFileStore {
    JsonFileStore::open(&temp.path().join("db.json")).await.unwrap()
}

#[tokio::test]
async fn test_open_creates_empty_document() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;

    let content = std::fs::read_to_string(store.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, serde_json::json!({"persons": []}));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_open_creates_missing_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data").join("nested").join("db.json");
    let store = JsonFileStore::open(&path).await.unwrap();
    assert!(store.path().exists());
}

#[tokio::test]
async fn test_open_keeps_existing_document() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db.json");
    std::fs::write(
        &path,
        r#"{"persons": [{"id": "1", "name": "Arto Hellas", "number": "040-123456"}]}"#,
    )
    .unwrap();

    let store = JsonFileStore::open(&path).await.unwrap();
    let persons = store.list().await.unwrap();
    assert_eq!(persons, vec![contact("1", "Arto Hellas", "040-123456")]);
}

#[tokio::test]
async fn test_insert_persists_whole_document() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;

    store
        .insert(contact("1", "Arto Hellas", "040-123456"))
        .await
        .unwrap();
    store
        .insert(contact("2", "Ada Lovelace", "39-44-5323523"))
        .await
        .unwrap();

    let content = std::fs::read_to_string(store.path()).unwrap();
    let document: ContactsFile = serde_json::from_str(&content).unwrap();
    assert_eq!(document.persons.len(), 2);
    assert_eq!(document.persons[1].name, "Ada Lovelace");
}

#[tokio::test]
async fn test_reads_see_external_edits() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;
    store
        .insert(contact("1", "Arto Hellas", "040-123456"))
        .await
        .unwrap();

    // Another process rewrites the file
    std::fs::write(store.path(), r#"{"persons": []}"#).unwrap();

    assert!(store.get(&ContactId::from("1")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_replace_and_delete() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;
    store
        .insert(contact("1", "Arto Hellas", "040-123456"))
        .await
        .unwrap();

    let updated = store
        .replace(
            &ContactId::from("1"),
            ContactPatch {
                number: "000-0000".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.number, "000-0000");
    assert_eq!(
        store.get(&ContactId::from("1")).await.unwrap().unwrap().number,
        "000-0000"
    );

    assert!(store.delete(&ContactId::from("1")).await.unwrap());
    assert!(!store.delete(&ContactId::from("1")).await.unwrap());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_replace_unknown_does_not_rewrite() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;
    let before = std::fs::metadata(store.path()).unwrap().modified().unwrap();

    let result = store
        .replace(
            &ContactId::from("42"),
            ContactPatch {
                number: "1".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    let after = std::fs::metadata(store.path()).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_corrupt_document_is_a_storage_error() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;
    std::fs::write(store.path(), "{ not json").unwrap();

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StorageError::Json(_)));
}

#[tokio::test]
async fn test_missing_file_after_open_is_io_error() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;
    std::fs::remove_file(store.path()).unwrap();

    let err = store
        .insert(contact("1", "Arto Hellas", "040-123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
}

#[tokio::test]
async fn test_concurrent_inserts_are_not_lost() {
    let temp = TempDir::new().unwrap();
    let store = std::sync::Arc::new(open_in(&temp).await);

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert(contact(&i.to_string(), &format!("Person {i}"), "040-123456"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.list().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_cancelled_insert_leaves_readable_document() {
    let temp = TempDir::new().unwrap();
    let store = open_in(&temp).await;
    store
        .insert(contact("1", "Arto Hellas", "040-123456"))
        .await
        .unwrap();

    for (i, micros) in [0_u64, 50, 200, 1_000, 5_000].into_iter().enumerate() {
        let id = format!("cancelled-{i}");
        let pending = store.insert(contact(&id, &format!("Person {i}"), "040-000000"));
        if let Ok(result) =
            tokio::time::timeout(std::time::Duration::from_micros(micros), pending).await
        {
            result.unwrap();
        }

        let content = std::fs::read_to_string(store.path()).unwrap();
        let document: ContactsFile = serde_json::from_str(&content).unwrap();
        assert_eq!(document.persons[0].name, "Arto Hellas");
    }

    // Let writes that outlived their callers land
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    let persons = store.list().await.unwrap();
    assert_eq!(persons[0].id.as_str(), "1");
    assert!(persons
        .iter()
        .skip(1)
        .all(|c| c.id.as_str().starts_with("cancelled-")));
}
