//! Catalog feature slice: devices and their photos.
//!
//! Device records live in the shared [`RegistryStore`]; photo bytes go to the upload
//! namespace of the storage engine and are referenced by file name only.

mod domain;
mod error;
#[cfg(feature = "server")]
mod server;

pub use crate::domain::{
    DeviceInfo, DeviceUpdate, NewDevice, all_device_info, delete_device, device_info,
    device_photo, photo_filename, register_device, update_device,
};
pub use crate::error::{CatalogError, CatalogErrorExt};
#[cfg(feature = "server")]
pub use crate::server::router;

use devreg_domain::models::{Device, RegistryDocument};
use devreg_kernel::domain::registry::InitializedSlice;
use devreg_storage::NamespacedStorage;
use devreg_store::RegistryStore;
use tracing::{info, warn};

/// Catalog feature state.
#[devreg_derive::feature_slice]
pub struct Catalog {
    store: RegistryStore,
    photos: NamespacedStorage,
}

impl Catalog {
    /// Stores the photo, then registers the device that points at it.
    ///
    /// A photo written for a registration that fails is removed again, unless it replaced a
    /// file that was already there.
    ///
    /// # Errors
    /// [`CatalogError::InvalidFilename`], [`CatalogError::MissingField`], photo or store
    /// failures.
    pub async fn upload(
        &self,
        new: NewDevice,
        original_filename: &str,
        photo: &[u8],
    ) -> Result<Device, CatalogError> {
        let filename = photo_filename(original_filename)?;
        if new.identifier.as_deref().is_none_or(|id| id.trim().is_empty()) {
            return Err(CatalogError::MissingField { field: "identifier", context: None });
        }

        let existed = self.photos.exists(&filename)?;
        self.photos.write(&filename, photo).await.context("Failed to store the photo")?;

        let registered = {
            let filename = filename.clone();
            self.store.mutate(move |doc| register_device(doc, new, filename)).await
        };

        match registered {
            Ok(device) => {
                info!(device = %device.identifier, file = %filename, bytes = photo.len(), "Device uploaded");
                Ok(device)
            },
            Err(err) => {
                if !existed && let Err(cleanup) = self.photos.delete(&filename).await {
                    warn!(file = %filename, error = %cleanup, "Failed to remove orphaned photo");
                }
                Err(err)
            },
        }
    }

    /// # Errors
    /// See [`device_info`].
    pub async fn info(&self, identifier: &str) -> Result<DeviceInfo, CatalogError> {
        self.store.read(|doc: &RegistryDocument| device_info(doc, identifier)).await
    }

    pub async fn all_info(&self) -> Vec<DeviceInfo> {
        self.store.read(all_device_info).await
    }

    /// Bytes of the device's photo.
    ///
    /// # Errors
    /// [`CatalogError::DeviceNotFound`], or [`CatalogError::Photo`] when the file is gone.
    pub async fn photo(&self, identifier: &str) -> Result<Vec<u8>, CatalogError> {
        let filename = self.store.read(|doc: &RegistryDocument| device_photo(doc, identifier)).await?;
        let bytes = self.photos.read(&filename).await.context("Failed to read the photo")?;
        Ok(bytes)
    }

    pub async fn document(&self) -> RegistryDocument {
        self.store.snapshot().await
    }

    /// # Errors
    /// See [`update_device`].
    pub async fn update(&self, update: DeviceUpdate) -> Result<Device, CatalogError> {
        let device = self.store.mutate(|doc| update_device(doc, update)).await?;
        info!(device = %device.identifier, "Device updated");
        Ok(device)
    }

    /// # Errors
    /// See [`delete_device`].
    pub async fn delete(&self, identifier: &str) -> Result<Device, CatalogError> {
        let device = self.store.mutate(|doc| delete_device(doc, identifier)).await?;
        info!(device = %device.identifier, file = %device.filename, "Device deleted");
        Ok(device)
    }
}

/// Initialize the catalog feature.
pub fn init(store: &RegistryStore, photos: &NamespacedStorage) -> InitializedSlice {
    info!(uploads = %photos.dir().display(), "Catalog slice initialized");

    InitializedSlice::new(Catalog::new(CatalogInner { store: store.clone(), photos: photos.clone() }))
}
