//! # Registry Store
//!
//! Owns the single registry document for the lifetime of the process.
//!
//! The document is loaded once from [`Storage`]. Every mutation then runs under one async
//! lock against a working copy. The copy is checkpointed to disk and only then becomes the
//! live document, so a failed mutation or a failed write changes neither memory nor disk.
//! Reads take the same lock briefly and hand out clones.
//!
//! ```rust,ignore
//! let store = RegistryStore::open(storage, "photos.json").await?;
//!
//! store
//!     .mutate(|doc| {
//!         doc.devices.push(Device::new("D1", "d1.jpg"));
//!         Ok::<_, StoreError>(())
//!     })
//!     .await?;
//!
//! assert!(store.read(|doc| doc.device("D1").is_some()).await);
//! ```

mod error;

pub use crate::error::{StoreError, StoreErrorExt};

use devreg_domain::models::RegistryDocument;
use devreg_storage::{Storage, StorageError};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct StoreInner {
    storage: Storage,
    file: String,
    document: Mutex<RegistryDocument>,
}

/// Cheaply clonable handle to the live registry document.
#[derive(Clone)]
pub struct RegistryStore {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for RegistryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryStore")
            .field("root", &self.inner.storage.root())
            .field("file", &self.inner.file)
            .finish_non_exhaustive()
    }
}

impl RegistryStore {
    /// Loads `file` from `storage`.
    ///
    /// A missing file yields an empty document. So does one that fails to decode, but its
    /// bytes are first copied to `<file>.unreadable` (or `<file>.unreadable.<n>` when that
    /// name is taken) so the next checkpoint cannot destroy them.
    ///
    /// # Errors
    /// Returns [`StoreError::Storage`] if the file exists but cannot be read, or if an
    /// undecodable file cannot be set aside.
    pub async fn open(storage: Storage, file: impl Into<String>) -> Result<Self, StoreError> {
        let file = file.into();

        let document = match storage.read(&file).await {
            Ok(bytes) => decode(&storage, &file, &bytes).await?,
            Err(StorageError::FileNotFound { .. }) => {
                info!(file = %file, "Registry document not found, starting empty");
                RegistryDocument::default()
            },
            Err(err) => return Err(err).context(format!("Failed to load {file}")),
        };

        info!(
            file = %file,
            devices = document.devices.len(),
            users = document.users.len(),
            "Registry document loaded"
        );

        Ok(Self { inner: Arc::new(StoreInner { storage, file, document: Mutex::new(document) }) })
    }

    /// Runs `f` against the live document.
    pub async fn read<R>(&self, f: impl FnOnce(&RegistryDocument) -> R) -> R {
        let guard = self.inner.document.lock().await;
        f(&guard)
    }

    /// A copy of the whole document.
    pub async fn snapshot(&self) -> RegistryDocument {
        self.read(RegistryDocument::clone).await
    }

    /// Applies `f` to a working copy and commits it once it is safely on disk.
    ///
    /// Mutations are serialized: no two run at the same time, and none observes a
    /// half-applied other.
    ///
    /// # Errors
    /// Returns whatever `f` returns, or the checkpoint failure converted into `E`. In both
    /// cases the live document is left as it was.
    pub async fn mutate<T, E>(
        &self,
        f: impl FnOnce(&mut RegistryDocument) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.inner.document.lock().await;

        let mut working = guard.clone();
        let output = f(&mut working)?;

        self.checkpoint(&working).await?;
        *guard = working;

        Ok(output)
    }

    /// The sandbox the document lives in.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    async fn checkpoint(&self, document: &RegistryDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document).context("Failed to encode registry")?;
        self.inner
            .storage
            .write(&self.inner.file, &bytes)
            .await
            .context(format!("Failed to checkpoint {}", self.inner.file))?;

        debug!(file = %self.inner.file, bytes = bytes.len(), "Registry checkpointed");
        Ok(())
    }
}

async fn decode(storage: &Storage, file: &str, bytes: &[u8]) -> Result<RegistryDocument, StoreError> {
    let err = match serde_json::from_slice(bytes) {
        Ok(document) => return Ok(document),
        Err(err) => err,
    };

    let aside = set_aside(storage, file, bytes).await?;
    warn!(
        file = %file,
        saved_as = %aside,
        error = %err,
        "Registry document is unreadable, starting empty"
    );
    Ok(RegistryDocument::default())
}

async fn set_aside(storage: &Storage, file: &str, bytes: &[u8]) -> Result<String, StoreError> {
    let base = format!("{file}.unreadable");
    let mut aside = base.clone();
    let mut n = 0_u32;
    while storage.exists(&aside)? {
        n += 1;
        aside = format!("{base}.{n}");
    }

    storage.write(&aside, bytes).await.context(format!("Failed to set aside {file}"))?;
    Ok(aside)
}
