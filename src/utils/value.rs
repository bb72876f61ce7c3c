use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Convert arbitrary JSON values into sanitized strings for display and storage.
pub fn value_to_string(value: Value) -> String {
    let raw = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    };
    sanitize_attribute_value(raw)
}

fn sanitize_attribute_value(s: String) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Deserialize an identifier the backend may send either as a string or as a number.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Err(D::Error::custom("identifier must not be null")),
        Value::Array(_) | Value::Object(_) => {
            Err(D::Error::custom("identifier must be a string or a number"))
        }
        other => Ok(value_to_string(other)),
    }
}

/// Same as [`deserialize_id`] but tolerates `null` and a missing field.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(D::Error::custom(
            "identifier must be a string or a number",
        )),
        Some(other) => Ok(Some(value_to_string(other))),
    }
}
