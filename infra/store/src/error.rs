use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[devreg_derive::app_error]
pub enum StoreError {
    /// Reading or checkpointing the document failed.
    #[error("Registry storage error{}: {source}", format_context(.context))]
    Storage { source: devreg_storage::StorageError, context: Option<Cow<'static, str>> },

    #[error("Registry encoding error{}: {source}", format_context(.context))]
    Encode { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
