use devreg_domain::models::{Device, RegistryDocument, Usage};
use devreg_storage::Storage;
use devreg_store::{RegistryStore, StoreError};
use std::borrow::Cow;
use tempfile::TempDir;

const FILE: &str = "photos.json";

#[devreg_derive::app_error]
enum MutationError {
    #[error("Store failed{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },
    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

async fn storage(temp: &TempDir) -> Storage {
    Storage::builder().root(temp.path()).connect().await.unwrap()
}

async fn add_device(store: &RegistryStore, identifier: &str) {
    store
        .mutate(|doc| {
            doc.devices.push(Device::new(identifier, format!("{identifier}.jpg")));
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_file_loads_empty() {
    let temp = TempDir::new().unwrap();
    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();

    assert_eq!(store.snapshot().await, RegistryDocument::default());
}

#[tokio::test]
async fn corrupt_file_is_set_aside_before_the_first_checkpoint() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(FILE), b"{ not json").unwrap();

    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    assert!(store.read(|doc| doc.devices.is_empty() && doc.users.is_empty()).await);

    add_device(&store, "D1").await;

    let aside = temp.path().join(format!("{FILE}.unreadable"));
    assert_eq!(std::fs::read(aside).unwrap(), b"{ not json");
}

#[tokio::test]
async fn earlier_unreadable_copy_is_not_overwritten() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(format!("{FILE}.unreadable")), b"older").unwrap();
    std::fs::write(temp.path().join(FILE), b"[1, 2").unwrap();

    RegistryStore::open(storage(&temp).await, FILE).await.unwrap();

    assert_eq!(std::fs::read(temp.path().join(format!("{FILE}.unreadable"))).unwrap(), b"older");
    assert_eq!(std::fs::read(temp.path().join(format!("{FILE}.unreadable.1"))).unwrap(), b"[1, 2");
}

#[tokio::test]
async fn hand_edited_values_keep_the_whole_document() {
    let temp = TempDir::new().unwrap();
    let raw = serde_json::json!({
        "devices": [
            { "identifier": "D1", "name": 12345, "filename": "d1.jpg", "usage": "no used" },
            { "identifier": 2, "serialNumber": 555, "filename": "d2.jpg", "usage": "retired" }
        ],
        "users": [{ "name": "alice", "login": 42, "password": 1234, "devices": [] }],
        "comment": "kept"
    });
    std::fs::write(temp.path().join(FILE), serde_json::to_vec(&raw).unwrap()).unwrap();

    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    let doc = store.snapshot().await;
    assert_eq!(doc.devices.len(), 2);
    assert_eq!(doc.device("D1").unwrap().name.as_deref(), Some("12345"));
    assert_eq!(doc.device("2").unwrap().usage, Usage::Other("retired".into()));
    assert_eq!(doc.user("alice").unwrap().login, "42");
    assert!(!temp.path().join(format!("{FILE}.unreadable")).exists());

    add_device(&store, "D3").await;

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp.path().join(FILE)).unwrap()).unwrap();
    assert_eq!(written["comment"], "kept");
    assert_eq!(written["devices"][1]["usage"], "retired");
    assert_eq!(written["devices"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn committed_mutation_survives_reload() {
    let temp = TempDir::new().unwrap();
    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    add_device(&store, "D1").await;

    let reopened = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    let device = reopened.read(|doc| doc.device("D1").cloned()).await.unwrap();
    assert_eq!(device.filename, "D1.jpg");
    assert_eq!(device.usage, Usage::Free);
}

#[tokio::test]
async fn document_is_pretty_printed() {
    let temp = TempDir::new().unwrap();
    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    add_device(&store, "D1").await;

    let text = std::fs::read_to_string(temp.path().join(FILE)).unwrap();
    assert!(text.starts_with("{\n  \"devices\": [\n    {\n"));
    assert!(text.contains("\"usage\": \"no used\""));
    assert!(text.contains("\"user\": \"available\""));
}

#[tokio::test]
async fn failed_mutation_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    add_device(&store, "D1").await;
    let on_disk = std::fs::read(temp.path().join(FILE)).unwrap();

    let result = store
        .mutate(|doc| {
            doc.devices.clear();
            Err::<(), _>(MutationError::Rejected { message: "no".into(), context: None })
        })
        .await;

    assert!(matches!(result, Err(MutationError::Rejected { .. })));
    assert_eq!(store.read(|doc| doc.devices.len()).await, 1);
    assert_eq!(std::fs::read(temp.path().join(FILE)).unwrap(), on_disk);
}

#[cfg(unix)]
#[tokio::test]
async fn failed_checkpoint_keeps_memory_unchanged() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    let store = RegistryStore::open(storage.clone(), "locked/photos.json").await.unwrap();

    // A plain file where the parent directory should be makes the write fail.
    std::fs::write(storage.root().join("locked"), b"").unwrap();

    let result = store
        .mutate(|doc| {
            doc.devices.push(Device::new("D1", "d1.jpg"));
            Ok::<_, MutationError>(())
        })
        .await;

    assert!(matches!(result, Err(MutationError::Store { .. })));
    assert!(store.read(|doc| doc.devices.is_empty()).await);
}

#[tokio::test]
async fn concurrent_mutations_are_not_lost() {
    let temp = TempDir::new().unwrap();
    let store = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { add_device(&store, &format!("D{i}")).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(store.read(|doc| doc.devices.len()).await, 16);
    let reopened = RegistryStore::open(storage(&temp).await, FILE).await.unwrap();
    assert_eq!(reopened.read(|doc| doc.devices.len()).await, 16);
}
