use super::device::Device;
use super::lenient;
use super::user::User;
use devreg_derive::api_model;
use serde_json::{Map, Value};

/// The whole persisted state: `{ "devices": [...], "users": [...] }`.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub devices: Vec<Device>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub users: Vec<User>,
    #[serde(flatten)]
    #[cfg_attr(feature = "server", schema(ignore))]
    pub extra: Map<String, Value>,
}

impl RegistryDocument {
    #[must_use]
    pub fn device(&self, identifier: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.identifier == identifier)
    }

    pub fn device_mut(&mut self, identifier: &str) -> Option<&mut Device> {
        self.devices.iter_mut().find(|device| device.identifier == identifier)
    }

    #[must_use]
    pub fn device_position(&self, identifier: &str) -> Option<usize> {
        self.devices.iter().position(|device| device.identifier == identifier)
    }

    #[must_use]
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|user| user.name == name)
    }

    #[must_use]
    pub fn login_taken(&self, login: &str) -> bool {
        self.users.iter().any(|user| user.login == login)
    }
}
