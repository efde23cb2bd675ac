//! Facade crate for the device registry features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it composes other crates, it does not implement business logic.
//!
//! ## Usage
//! - Add `devreg` with the `server` feature to get the HTTP routers.
//! - Call [`init`] to build every feature slice over one store and upload namespace.

pub use devreg_domain as domain;
use devreg_domain::registry::InitializedSlice;
pub use devreg_kernel as kernel;
use devreg_storage::NamespacedStorage;
use devreg_store::RegistryStore;

/// Feature slices.
pub mod features {
    pub use devreg_assignment as assignment;
    pub use devreg_catalog as catalog;
}

#[cfg(feature = "server")]
pub mod server {
    use devreg_kernel::server::ApiState;
    use devreg_kernel::server::router::system_router;
    use utoipa_axum::router::OpenApiRouter;

    /// Every API route: system endpoints plus each feature slice.
    pub fn api_router() -> OpenApiRouter<ApiState> {
        system_router()
            .merge(super::features::catalog::router())
            .merge(super::features::assignment::router())
    }
}

/// Initializes every feature slice over the shared registry store.
///
/// `photos` is the storage namespace uploaded device photos are written to.
#[must_use]
pub fn init(store: &RegistryStore, photos: &NamespacedStorage) -> Vec<InitializedSlice> {
    vec![features::catalog::init(store, photos), features::assignment::init(store)]
}

