//! Field readers for hand-edited or legacy documents.
//!
//! Text fields accept any JSON scalar: numbers and booleans are kept as their JSON text and
//! `null` counts as absent. Arrays or objects in a text slot are kept as their JSON text too,
//! so one odd value never rejects the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Reads a text field; `null` becomes the empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Option::unwrap_or_default)
}

/// [`text`] for optional fields; pair it with `#[serde(default)]`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_text)
}

/// Reads a patch field: `Some(None)` for an explicit `null`, `Some(Some(_))` for a value.
/// An absent field needs `#[serde(default)]` to come out as `None`.
pub fn patch_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Some)
}

/// Reads `null` as the type's default.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        #[serde(deserialize_with = "patch_text")]
        name: Option<Option<String>>,
        #[serde(deserialize_with = "text")]
        login: String,
    }

    #[test]
    fn scalars_read_as_text() {
        assert_eq!(scalar_text(json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(scalar_text(json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(json!("x")).as_deref(), Some("x"));
        assert_eq!(scalar_text(json!(null)), None);
    }

    #[test]
    fn patch_tells_null_from_absent() {
        let absent: Patch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.name, None);

        let cleared: Patch = serde_json::from_value(json!({ "name": null, "login": null })).unwrap();
        assert_eq!(cleared.name, Some(None));
        assert_eq!(cleared.login, "");

        let set: Patch = serde_json::from_value(json!({ "name": 7 })).unwrap();
        assert_eq!(set.name, Some(Some("7".into())));
    }
}
