//! Kernel utilities shared across slices.
//!
//! Keep this crate lightweight: configuration loading, the API state that carries the
//! registry store and the feature slices, the HTTP error type every handler returns, and
//! request extractors.
//!
//! ```rust,ignore
//! use devreg_kernel::config::load_config;
//! use devreg_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(None::<&str>)?;
//! ```

pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

pub use devreg_domain as domain;
