//! The registry document as persisted on disk.
//!
//! Field names are camelCase. Values the service writes itself (`usage`, `user`) keep the
//! legacy wire strings `"no used"`, `"is use"` and `"available"`. Loading is lenient: missing
//! fields take their defaults, scalar values in text fields are read as strings, and fields
//! the service does not know are carried through to the next write.

mod device;
mod document;
pub mod lenient;
mod user;

pub use device::{Device, Holder, Usage};
pub use document::RegistryDocument;
pub use user::{User, UserDevice};
