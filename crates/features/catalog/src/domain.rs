//! Catalog rules over the registry document.

use crate::error::CatalogError;
use devreg_derive::api_model;
use devreg_domain::models::{Device, RegistryDocument};
use std::path::Path;

/// Public view of a device: no photo, usage or holder.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl From<&Device> for DeviceInfo {
    fn from(device: &Device) -> Self {
        Self {
            identifier: device.identifier.clone(),
            name: device.name.clone(),
            description: device.description.clone(),
            serial_number: device.serial_number.clone(),
            manufacturer: device.manufacturer.clone(),
        }
    }
}

/// Descriptive fields of a device being registered.
#[derive(Debug, Clone, Default)]
pub struct NewDevice {
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
}

/// Partial edit. `None` keeps the current value, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub identifier: String,
    pub name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub serial_number: Option<Option<String>>,
    pub manufacturer: Option<Option<String>>,
}

/// Reduces a client-supplied file name to its last path component.
///
/// # Errors
/// [`CatalogError::InvalidFilename`] when nothing usable is left.
pub fn photo_filename(original: &str) -> Result<String, CatalogError> {
    Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| CatalogError::InvalidFilename { filename: original.to_owned(), context: None })
}

/// Appends a free device whose photo is stored as `filename`.
///
/// Identifiers are not checked for uniqueness; lookups resolve to the first match.
///
/// # Errors
/// [`CatalogError::MissingField`] without an identifier.
pub fn register_device(
    doc: &mut RegistryDocument,
    new: NewDevice,
    filename: String,
) -> Result<Device, CatalogError> {
    let identifier = new
        .identifier
        .filter(|id| !id.trim().is_empty())
        .ok_or(CatalogError::MissingField { field: "identifier", context: None })?;

    let device = Device {
        name: new.name,
        description: new.description,
        serial_number: new.serial_number,
        manufacturer: new.manufacturer,
        ..Device::new(identifier, filename)
    };
    doc.devices.push(device.clone());
    Ok(device)
}

fn not_found(identifier: &str) -> CatalogError {
    CatalogError::DeviceNotFound { identifier: identifier.to_owned(), context: None }
}

/// # Errors
/// [`CatalogError::DeviceNotFound`].
pub fn device_info(doc: &RegistryDocument, identifier: &str) -> Result<DeviceInfo, CatalogError> {
    doc.device(identifier).map(DeviceInfo::from).ok_or_else(|| not_found(identifier))
}

#[must_use]
pub fn all_device_info(doc: &RegistryDocument) -> Vec<DeviceInfo> {
    doc.devices.iter().map(DeviceInfo::from).collect()
}

/// Photo file name of the first device with `identifier`.
///
/// # Errors
/// [`CatalogError::DeviceNotFound`].
pub fn device_photo(doc: &RegistryDocument, identifier: &str) -> Result<String, CatalogError> {
    doc.device(identifier).map(|device| device.filename.clone()).ok_or_else(|| not_found(identifier))
}

/// Merges the supplied fields into the first device with the identifier.
///
/// # Errors
/// [`CatalogError::DeviceNotFound`].
pub fn update_device(doc: &mut RegistryDocument, update: DeviceUpdate) -> Result<Device, CatalogError> {
    let device = doc.device_mut(&update.identifier).ok_or_else(|| not_found(&update.identifier))?;

    let DeviceUpdate { name, description, serial_number, manufacturer, .. } = update;
    if let Some(name) = name {
        device.name = name;
    }
    if let Some(description) = description {
        device.description = description;
    }
    if let Some(serial_number) = serial_number {
        device.serial_number = serial_number;
    }
    if let Some(manufacturer) = manufacturer {
        device.manufacturer = manufacturer;
    }

    Ok(device.clone())
}

/// Removes the first device with the identifier.
///
/// Users' device lists and the photo file are left untouched.
///
/// # Errors
/// [`CatalogError::DeviceNotFound`].
pub fn delete_device(doc: &mut RegistryDocument, identifier: &str) -> Result<Device, CatalogError> {
    let position = doc.device_position(identifier).ok_or_else(|| not_found(identifier))?;
    Ok(doc.devices.remove(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use devreg_domain::models::{Holder, Usage, User, UserDevice};

    fn new_device(identifier: &str) -> NewDevice {
        NewDevice {
            identifier: Some(identifier.into()),
            name: Some("Router".into()),
            serial_number: Some("SN-1".into()),
            ..NewDevice::default()
        }
    }

    #[test]
    fn filenames_are_reduced_to_last_component() {
        assert_eq!(photo_filename("router.jpg").unwrap(), "router.jpg");
        assert_eq!(photo_filename("../../etc/router.jpg").unwrap(), "router.jpg");
        assert!(photo_filename("..").is_err());
        assert!(photo_filename("").is_err());
    }

    #[test]
    fn registered_device_starts_free() {
        let mut doc = RegistryDocument::default();
        let device = register_device(&mut doc, new_device("D1"), "d1.jpg".into()).unwrap();

        assert_eq!(device.usage, Usage::Free);
        assert_eq!(device.user, Holder::Available);
        assert_eq!(device.filename, "d1.jpg");
        assert_eq!(doc.devices, vec![device]);
    }

    #[test]
    fn register_requires_identifier_but_allows_duplicates() {
        let mut doc = RegistryDocument::default();
        let missing = NewDevice { identifier: None, ..new_device("D1") };
        assert!(matches!(
            register_device(&mut doc, missing, "x.jpg".into()),
            Err(CatalogError::MissingField { field: "identifier", .. })
        ));

        register_device(&mut doc, new_device("D1"), "a.jpg".into()).unwrap();
        register_device(&mut doc, new_device("D1"), "b.jpg".into()).unwrap();
        assert_eq!(doc.devices.len(), 2);
        assert_eq!(device_photo(&doc, "D1").unwrap(), "a.jpg");
    }

    #[test]
    fn info_hides_internal_fields() {
        let mut doc = RegistryDocument::default();
        register_device(&mut doc, new_device("D1"), "d1.jpg".into()).unwrap();

        let info = device_info(&doc, "D1").unwrap();
        assert_eq!(info.name.as_deref(), Some("Router"));
        assert!(info.description.is_none());
        assert_eq!(all_device_info(&doc), vec![info]);
        assert!(matches!(device_info(&doc, "D2"), Err(CatalogError::DeviceNotFound { .. })));
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let mut doc = RegistryDocument::default();
        register_device(&mut doc, new_device("D1"), "d1.jpg".into()).unwrap();

        let updated = update_device(
            &mut doc,
            DeviceUpdate {
                identifier: "D1".into(),
                description: Some(Some("Core switch".into())),
                ..DeviceUpdate::default()
            },
        )
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Router"));
        assert_eq!(updated.description.as_deref(), Some("Core switch"));
        assert_eq!(updated.serial_number.as_deref(), Some("SN-1"));
        assert_eq!(doc.device("D1"), Some(&updated));
    }

    #[test]
    fn update_with_explicit_none_clears_the_field() {
        let mut doc = RegistryDocument::default();
        register_device(&mut doc, new_device("D1"), "d1.jpg".into()).unwrap();

        let updated = update_device(
            &mut doc,
            DeviceUpdate { identifier: "D1".into(), name: Some(None), ..DeviceUpdate::default() },
        )
        .unwrap();

        assert!(updated.name.is_none());
        assert_eq!(updated.serial_number.as_deref(), Some("SN-1"));
    }

    #[test]
    fn update_and_delete_unknown_device_fail() {
        let mut doc = RegistryDocument::default();
        let update = DeviceUpdate { identifier: "D9".into(), ..DeviceUpdate::default() };
        assert!(matches!(update_device(&mut doc, update), Err(CatalogError::DeviceNotFound { .. })));
        assert!(matches!(delete_device(&mut doc, "D9"), Err(CatalogError::DeviceNotFound { .. })));
    }

    #[test]
    fn delete_leaves_user_lists_stale() {
        let mut doc = RegistryDocument::default();
        register_device(&mut doc, new_device("D1"), "d1.jpg".into()).unwrap();
        doc.users.push(User {
            name: "alice".into(),
            devices: vec![UserDevice::in_use("D1")],
            ..User::default()
        });

        let removed = delete_device(&mut doc, "D1").unwrap();

        assert_eq!(removed.identifier, "D1");
        assert!(doc.devices.is_empty());
        assert_eq!(doc.users[0].devices, vec![UserDevice::in_use("D1")]);
    }
}
