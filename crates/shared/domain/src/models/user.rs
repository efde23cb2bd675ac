use super::device::Usage;
use super::lenient;
use devreg_derive::api_model;
use serde_json::{Map, Value};

/// One entry of a user's device list. It can outlive the device it points to.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserDevice {
    #[serde(deserialize_with = "lenient::text")]
    pub identifier: String,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "is use"))]
    pub usage: Usage,
    #[serde(flatten)]
    #[cfg_attr(feature = "server", schema(ignore))]
    pub extra: Map<String, Value>,
}

impl UserDevice {
    #[must_use]
    pub fn in_use(identifier: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), usage: Usage::InUse, extra: Map::new() }
    }
}

/// A registered user, looked up by `name`. `login` is unique; `password` is kept as given.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub surname: String,
    #[serde(deserialize_with = "lenient::text")]
    pub login: String,
    #[serde(deserialize_with = "lenient::text")]
    pub password: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub devices: Vec<UserDevice>,
    /// Fields this service does not manage, written back as found.
    #[serde(flatten)]
    #[cfg_attr(feature = "server", schema(ignore))]
    pub extra: Map<String, Value>,
}

impl User {
    /// Position of the first list entry for `identifier`.
    #[must_use]
    pub fn device_position(&self, identifier: &str) -> Option<usize> {
        self.devices.iter().position(|entry| entry.identifier == identifier)
    }
}
