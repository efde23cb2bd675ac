//! Sandboxed filesystem storage.
//!
//! Every path handed to [`Storage`] is relative to a canonical root directory and is checked
//! so that it can never escape it. Writes go through an atomic swap (unique temp file,
//! `fsync`, rename), so readers never observe a half-written file, and temp files orphaned
//! by a crash are purged when the storage is opened.
//!
//! [`NamespacedStorage`] scopes a handle to one sub-directory, e.g. the upload area that
//! holds device photos next to the registry document.
//!
//! ```rust
//! use devreg_storage::{Storage, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let storage = Storage::builder().root(&root).connect().await?;
//!
//!     storage.write("photos.json", b"{}").await?;
//!     assert_eq!(storage.read("photos.json").await?, b"{}");
//!
//!     let uploads = storage.namespace("uploads")?;
//!     uploads.write("router.jpg", b"jpeg bytes").await?;
//!     assert!(uploads.exists("router.jpg")?);
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
pub use namespace::{NamespaceName, NamespacedStorage};
