//! Assignment feature slice: users and the devices they hold.
//!
//! The rules live in pure functions over [`RegistryDocument`]
//! ([`assign_device`], [`release_device`], [`user_devices`], [`add_user`]). The
//! [`Assignment`] slice runs them through the [`RegistryStore`], so each call is serialized
//! with every other mutation and persisted before it takes effect.

mod domain;
mod error;
#[cfg(feature = "server")]
mod server;

pub use crate::domain::{NewUser, Released, add_user, assign_device, release_device, user_devices};
pub use crate::error::{AssignmentError, AssignmentErrorExt};
#[cfg(feature = "server")]
pub use crate::server::router;

use devreg_domain::models::{RegistryDocument, User, UserDevice};
use devreg_kernel::domain::registry::InitializedSlice;
use devreg_store::RegistryStore;
use tracing::info;

/// Assignment feature state.
#[devreg_derive::feature_slice]
pub struct Assignment {
    store: RegistryStore,
}

impl Assignment {
    /// # Errors
    /// See [`add_user`]; store failures surface as [`AssignmentError::Store`].
    pub async fn add_user(&self, new: NewUser) -> Result<User, AssignmentError> {
        let user = self.store.mutate(|doc| add_user(doc, new)).await?;
        info!(user = %user.name, login = %user.login, "User added");
        Ok(user)
    }

    /// # Errors
    /// See [`assign_device`].
    pub async fn assign(
        &self,
        identifier: &str,
        username: &str,
    ) -> Result<UserDevice, AssignmentError> {
        let entry = self.store.mutate(|doc| assign_device(doc, identifier, username)).await?;
        info!(device = %identifier, user = %username, "Device assigned");
        Ok(entry)
    }

    /// # Errors
    /// See [`release_device`].
    pub async fn release(
        &self,
        identifier: &str,
        username: &str,
    ) -> Result<Released, AssignmentError> {
        let released = self.store.mutate(|doc| release_device(doc, identifier, username)).await?;
        info!(
            device = %identifier,
            user = %username,
            device_reset = released.device_reset,
            "Device released"
        );
        Ok(released)
    }

    /// # Errors
    /// See [`user_devices`].
    pub async fn devices_of(&self, username: &str) -> Result<Vec<UserDevice>, AssignmentError> {
        self.store.read(|doc: &RegistryDocument| user_devices(doc, username)).await
    }
}

/// Initialize the assignment feature.
pub fn init(store: &RegistryStore) -> InitializedSlice {
    tracing::info!("Assignment slice initialized");

    InitializedSlice::new(Assignment::new(AssignmentInner { store: store.clone() }))
}
