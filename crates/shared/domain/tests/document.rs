use devreg_domain::models::{Device, Holder, RegistryDocument, Usage, User, UserDevice};
use serde_json::json;

#[test]
fn empty_object_loads_as_empty_document() {
    let doc: RegistryDocument = serde_json::from_value(json!({})).unwrap();
    assert!(doc.devices.is_empty());
    assert!(doc.users.is_empty());
}

#[test]
fn missing_device_fields_take_defaults() {
    let doc: RegistryDocument = serde_json::from_value(json!({
        "devices": [{ "identifier": "D1", "filename": "d1.jpg" }]
    }))
    .unwrap();

    let device = doc.device("D1").unwrap();
    assert_eq!(device.usage, Usage::Free);
    assert_eq!(device.user, Holder::Available);
    assert!(device.name.is_none());
}

#[test]
fn numeric_identifiers_are_read_as_strings() {
    let doc: RegistryDocument = serde_json::from_value(json!({
        "devices": [{ "identifier": 42, "filename": "a.jpg" }],
        "users": [{ "name": "alice", "devices": [{ "identifier": 42, "usage": "is use" }] }]
    }))
    .unwrap();

    assert!(doc.device("42").is_some());
    assert_eq!(doc.user("alice").unwrap().device_position("42"), Some(0));
}

#[test]
fn device_serializes_with_legacy_wire_names() {
    let mut device = Device::new("D1", "d1.jpg");
    device.serial_number = Some("SN-1".into());
    device.usage = Usage::InUse;
    device.user = Holder::User("alice".into());

    let value = serde_json::to_value(&device).unwrap();
    assert_eq!(
        value,
        json!({
            "identifier": "D1",
            "serialNumber": "SN-1",
            "filename": "d1.jpg",
            "usage": "is use",
            "user": "alice"
        })
    );
}

#[test]
fn unknown_usage_is_written_back_unchanged() {
    let entry: UserDevice =
        serde_json::from_value(json!({ "identifier": "D1", "usage": "broken" })).unwrap();

    assert_eq!(entry.usage, Usage::Other("broken".into()));
    assert_eq!(serde_json::to_value(&entry).unwrap()["usage"], "broken");
}

#[test]
fn scalar_text_fields_are_read_as_strings() {
    let doc: RegistryDocument = serde_json::from_value(json!({
        "devices": [{
            "identifier": "D1",
            "name": 12345,
            "serialNumber": 9.5,
            "manufacturer": true,
            "description": null,
            "filename": "d1.jpg",
            "user": null
        }],
        "users": [{ "name": "alice", "login": 7, "password": 1234, "devices": null }]
    }))
    .unwrap();

    let device = doc.device("D1").unwrap();
    assert_eq!(device.name.as_deref(), Some("12345"));
    assert_eq!(device.serial_number.as_deref(), Some("9.5"));
    assert_eq!(device.manufacturer.as_deref(), Some("true"));
    assert!(device.description.is_none());
    assert_eq!(device.user, Holder::Available);

    let user = doc.user("alice").unwrap();
    assert_eq!(user.login, "7");
    assert_eq!(user.password, "1234");
    assert!(user.devices.is_empty());
}

#[test]
fn unrecognized_fields_survive_a_round_trip() {
    let original = json!({
        "version": 3,
        "devices": [{
            "identifier": "D1",
            "filename": "d1.jpg",
            "usage": "no used",
            "user": "available",
            "location": { "room": "B12" }
        }],
        "users": [{
            "name": "alice",
            "surname": "Smith",
            "login": "asmith",
            "password": "pw",
            "email": "alice@example.com",
            "devices": [{ "identifier": "D1", "usage": "is use", "since": "2024-01-01" }]
        }]
    });

    let doc: RegistryDocument = serde_json::from_value(original.clone()).unwrap();
    assert_eq!(doc.extra["version"], 3);
    assert_eq!(doc.device("D1").unwrap().extra["location"]["room"], "B12");

    assert_eq!(serde_json::to_value(&doc).unwrap(), original);
}

#[test]
fn lookups_take_first_match() {
    let mut doc = RegistryDocument::default();
    doc.devices.push(Device::new("D1", "first.jpg"));
    doc.devices.push(Device::new("D1", "second.jpg"));
    doc.users.push(User { name: "alice".into(), login: "a".into(), ..User::default() });

    assert_eq!(doc.device("D1").unwrap().filename, "first.jpg");
    assert_eq!(doc.device_position("D1"), Some(0));
    assert!(doc.login_taken("a"));
    assert!(!doc.login_taken("b"));
    assert!(doc.user("bob").is_none());
}
