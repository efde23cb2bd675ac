#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros shared by every crate of the device registry workspace.
//!
//! * [`app_error`] turns an enum into a `thiserror` error with `.context(..)` support.
//! * [`api_model`] / [`api_handler`] keep DTOs and Axum handlers consistent with the
//!   generated `OpenAPI` document.
//! * [`feature_slice`] wraps feature state so it can be registered in the API state.
//! * [`main`] bootstraps the tuned Tokio runtime from `devreg-runtime`.
//!
//! Doc examples are `ignore`d; they need the consuming crates to compile.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Bootstraps a `devreg_runtime` Tokio runtime around an `async fn main`.
///
/// Accepts an optional profile: `high_performance`, `memory_efficient` or `default`.
/// The function must return a `Result`.
///
/// ```rust,ignore
/// #[devreg_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares an API data model (request or response DTO).
///
/// Adds `Debug`, `Serialize` and `Deserialize` when they are not derived already, derives
/// `utoipa::ToSchema` behind the consuming crate's `server` feature, and applies
/// `#[serde(rename_all = "camelCase")]` plus `#[serde(deny_unknown_fields)]`.
///
/// Both serde defaults can be overridden:
///
/// ```rust,ignore
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct DeviceInfo {
///     pub identifier: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an Axum handler in the `OpenAPI` document.
///
/// The arguments are forwarded verbatim to `utoipa::path`.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into a crate error type.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * A `<Name>Ext` trait adding `.context(..)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant that wraps a `source`.
/// * `From<Source>` for every variant with a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a `source` must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[devreg_derive::app_error]
/// pub enum StoreError {
///     #[error("Storage failure{}: {source}", format_context(.context))]
///     Storage { source: devreg_storage::StorageError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn app_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Wraps a feature state struct into a cheaply clonable slice handle.
///
/// For `struct Catalog { .. }` this emits `CatalogInner` holding the fields, a `Catalog`
/// wrapper around `Arc<CatalogInner>` with `new` and `Deref`, and an implementation of
/// `devreg_kernel::domain::registry::FeatureSlice`.
///
/// ```rust,ignore
/// #[devreg_derive::feature_slice]
/// pub struct Catalog {
///     pub photos: NamespacedStorage,
/// }
/// ```
#[proc_macro_attribute]
pub fn feature_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
