//! # Domain Models
//!
//! Pure data for the device registry: the persisted registry document, its devices and users,
//! service configuration, and the feature-slice registry.
//! Keep it lean: no I/O, networking, or business rules. Lookups by key are the only helpers.

pub mod config;
pub mod constants;
pub mod models;
pub mod registry;
