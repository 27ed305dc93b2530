use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod attendance;
pub mod employee;
pub mod health;
pub mod stats;

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body field that takes any JSON scalar as text: `1001` reads as `"1001"`.
/// `null` reads as absent; arrays and objects are rejected.
pub(crate) fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, number or boolean, got {other}"
        ))),
    }
}
