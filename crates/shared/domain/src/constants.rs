/// OpenAPI tag for operational endpoints.
pub const SYSTEM_TAG: &str = "System";
/// OpenAPI tag for device catalog endpoints.
pub const CATALOG_TAG: &str = "Catalog";
/// OpenAPI tag for users and device assignment endpoints.
pub const ASSIGNMENT_TAG: &str = "Assignment";

/// Persisted `user` value of a device nobody holds.
pub const AVAILABLE: &str = "available";
/// Persisted `usage` value of a free device.
pub const USAGE_FREE: &str = "no used";
/// Persisted `usage` value of an assigned device.
pub const USAGE_IN_USE: &str = "is use";

/// Default name of the registry document inside the data directory.
pub const REGISTRY_FILE: &str = "photos.json";
/// Default sub-directory of the data directory holding uploaded photos.
pub const UPLOADS_DIR: &str = "uploads";
