use devreg_catalog::{Catalog, CatalogError, DeviceUpdate, NewDevice, init};
use devreg_domain::models::{Holder, Usage, User, UserDevice};
use devreg_storage::Storage;
use devreg_store::{RegistryStore, StoreError};
use tempfile::TempDir;

async fn setup(temp: &TempDir) -> (RegistryStore, Catalog) {
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();
    let photos = storage.namespace("uploads").unwrap();
    let store = RegistryStore::open(storage, "photos.json").await.unwrap();

    let slice = init(&store, &photos);
    let catalog = slice.downcast_ref::<Catalog>().unwrap().clone();
    (store, catalog)
}

fn router_device(identifier: &str) -> NewDevice {
    NewDevice {
        identifier: Some(identifier.into()),
        name: Some("Router".into()),
        manufacturer: Some("Acme".into()),
        ..NewDevice::default()
    }
}

#[tokio::test]
async fn init_registers_catalog_slice() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();
    let photos = storage.namespace("uploads").unwrap();
    let store = RegistryStore::open(storage, "photos.json").await.unwrap();

    assert_eq!(init(&store, &photos).id, std::any::TypeId::of::<Catalog>());
}

#[tokio::test]
async fn upload_stores_photo_and_registers_free_device() {
    let temp = TempDir::new().unwrap();
    let (store, catalog) = setup(&temp).await;

    let device = catalog.upload(router_device("D1"), "router.jpg", b"jpeg bytes").await.unwrap();

    assert_eq!(device.filename, "router.jpg");
    assert_eq!(device.usage, Usage::Free);
    assert_eq!(device.user, Holder::Available);
    assert_eq!(std::fs::read(temp.path().join("uploads/router.jpg")).unwrap(), b"jpeg bytes");
    assert_eq!(catalog.photo("D1").await.unwrap(), b"jpeg bytes");

    let on_disk: serde_json::Value =
        serde_json::from_slice(&store.storage().read("photos.json").await.unwrap()).unwrap();
    assert_eq!(on_disk["devices"][0]["identifier"], "D1");
    assert_eq!(on_disk["devices"][0]["usage"], "no used");
    assert_eq!(on_disk["devices"][0]["user"], "available");
}

#[tokio::test]
async fn upload_strips_directories_from_the_file_name() {
    let temp = TempDir::new().unwrap();
    let (_, catalog) = setup(&temp).await;

    let device = catalog.upload(router_device("D1"), "../../evil.jpg", b"x").await.unwrap();

    assert_eq!(device.filename, "evil.jpg");
    assert!(temp.path().join("uploads/evil.jpg").is_file());
    assert!(!temp.path().parent().unwrap().join("evil.jpg").exists());
}

#[tokio::test]
async fn upload_without_identifier_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let (_, catalog) = setup(&temp).await;

    let new = NewDevice { identifier: Some("  ".into()), ..NewDevice::default() };
    let err = catalog.upload(new, "a.jpg", b"x").await.unwrap_err();

    assert!(matches!(err, CatalogError::MissingField { field: "identifier", .. }));
    assert!(!temp.path().join("uploads/a.jpg").exists());
    assert!(catalog.document().await.devices.is_empty());
}

#[tokio::test]
async fn info_lists_public_fields_only() {
    let temp = TempDir::new().unwrap();
    let (_, catalog) = setup(&temp).await;
    catalog.upload(router_device("D1"), "d1.jpg", b"1").await.unwrap();
    catalog.upload(router_device("D2"), "d2.jpg", b"2").await.unwrap();

    let info = catalog.info("D2").await.unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json, serde_json::json!({"identifier": "D2", "name": "Router", "manufacturer": "Acme"}));

    assert_eq!(catalog.all_info().await.len(), 2);
    assert!(matches!(catalog.info("D3").await, Err(CatalogError::DeviceNotFound { .. })));
}

#[tokio::test]
async fn update_is_a_partial_merge() {
    let temp = TempDir::new().unwrap();
    let (_, catalog) = setup(&temp).await;
    catalog.upload(router_device("D1"), "d1.jpg", b"1").await.unwrap();

    let device = catalog
        .update(DeviceUpdate {
            identifier: "D1".into(),
            serial_number: Some(Some("SN-42".into())),
            manufacturer: Some(None),
            ..DeviceUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(device.name.as_deref(), Some("Router"));
    assert_eq!(device.serial_number.as_deref(), Some("SN-42"));
    assert!(device.manufacturer.is_none());
    assert_eq!(device.filename, "d1.jpg");
    assert_eq!(catalog.document().await.device("D1"), Some(&device));
}

#[tokio::test]
async fn delete_keeps_photo_and_user_lists() {
    let temp = TempDir::new().unwrap();
    let (store, catalog) = setup(&temp).await;
    catalog.upload(router_device("D1"), "d1.jpg", b"1").await.unwrap();
    store
        .mutate(|doc| {
            doc.users.push(User {
                name: "alice".into(),
                devices: vec![UserDevice::in_use("D1")],
                ..User::default()
            });
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

    catalog.delete("D1").await.unwrap();

    let doc = catalog.document().await;
    assert!(doc.devices.is_empty());
    assert_eq!(doc.users[0].devices, vec![UserDevice::in_use("D1")]);
    assert!(temp.path().join("uploads/d1.jpg").is_file());
    assert!(matches!(catalog.delete("D1").await, Err(CatalogError::DeviceNotFound { .. })));
}

#[tokio::test]
async fn missing_photo_file_is_a_storage_error() {
    let temp = TempDir::new().unwrap();
    let (_, catalog) = setup(&temp).await;
    catalog.upload(router_device("D1"), "d1.jpg", b"1").await.unwrap();
    std::fs::remove_file(temp.path().join("uploads/d1.jpg")).unwrap();

    assert!(matches!(catalog.photo("D1").await, Err(CatalogError::Photo { .. })));
    assert!(matches!(catalog.photo("D9").await, Err(CatalogError::DeviceNotFound { .. })));
}
