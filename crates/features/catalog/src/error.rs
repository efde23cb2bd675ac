use std::borrow::Cow;

/// A specialized [`CatalogError`] enum of this crate.
#[devreg_derive::app_error]
pub enum CatalogError {
    #[error("Device not found{}: {identifier}", format_context(.context))]
    DeviceNotFound { identifier: String, context: Option<Cow<'static, str>> },

    #[error("Missing required field{}: {field}", format_context(.context))]
    MissingField { field: &'static str, context: Option<Cow<'static, str>> },

    #[error("Invalid photo file name{}: {filename}", format_context(.context))]
    InvalidFilename { filename: String, context: Option<Cow<'static, str>> },

    /// The photo could not be written or read back.
    #[error("Photo storage error{}: {source}", format_context(.context))]
    Photo { source: devreg_storage::StorageError, context: Option<Cow<'static, str>> },

    #[error("Registry store error{}: {source}", format_context(.context))]
    Store { source: devreg_store::StoreError, context: Option<Cow<'static, str>> },
}
