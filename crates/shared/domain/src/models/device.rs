use super::lenient;
use crate::constants::{AVAILABLE, USAGE_FREE, USAGE_IN_USE};
use devreg_derive::api_model;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Whether a device is currently held by a user.
///
/// Only `"is use"` blocks assignment. Any other stored value is kept verbatim in
/// [`Usage::Other`] and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Usage {
    #[default]
    Free,
    InUse,
    Other(String),
}

impl Usage {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Free => USAGE_FREE,
            Self::InUse => USAGE_IN_USE,
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_in_use(&self) -> bool {
        matches!(self, Self::InUse)
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Usage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A missing or `null` usage reads as free.
impl<'de> Deserialize<'de> for Usage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match lenient::optional_text(deserializer)? {
            None => Self::Free,
            Some(raw) if raw == USAGE_FREE => Self::Free,
            Some(raw) if raw == USAGE_IN_USE => Self::InUse,
            Some(raw) => Self::Other(raw),
        })
    }
}

/// Who holds a device: nobody (`"available"`) or the named user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Holder {
    #[default]
    Available,
    User(String),
}

impl Holder {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => AVAILABLE,
            Self::User(name) => name,
        }
    }
}

impl From<String> for Holder {
    fn from(value: String) -> Self {
        if value == AVAILABLE { Self::Available } else { Self::User(value) }
    }
}

impl From<Holder> for String {
    fn from(value: Holder) -> Self {
        match value {
            Holder::Available => AVAILABLE.to_owned(),
            Holder::User(name) => name,
        }
    }
}

/// A missing or `null` holder reads as available.
impl<'de> Deserialize<'de> for Holder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::optional_text(deserializer)?.map_or(Self::Available, Self::from))
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry. `identifier` is caller-chosen and not guaranteed unique; lookups take
/// the first match.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Device {
    #[serde(deserialize_with = "lenient::text")]
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_text")]
    pub manufacturer: Option<String>,
    /// Photo file name inside the upload directory.
    #[serde(deserialize_with = "lenient::text")]
    pub filename: String,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "no used"))]
    pub usage: Usage,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "available"))]
    pub user: Holder,
    /// Fields this service does not manage, written back as found.
    #[serde(flatten)]
    #[cfg_attr(feature = "server", schema(ignore))]
    pub extra: Map<String, Value>,
}

impl Device {
    /// A fresh, unassigned device.
    #[must_use]
    pub fn new(identifier: impl Into<String>, filename: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), filename: filename.into(), ..Self::default() }
    }

    /// Puts the device back into the free pool.
    pub fn release(&mut self) {
        self.usage = Usage::Free;
        self.user = Holder::Available;
    }
}
