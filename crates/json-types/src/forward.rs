//! Forward conversion: structured representation → JSON value.
//!
//! Applies to the output of the structured converters, which only contain
//! JSON-compatible kinds (null, numbers, text, booleans, lists and maps).

use convert_core::{ConvertError, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Wrapper for JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonValue(pub serde_json::Value);

impl JsonValue {
    /// Get the inner JSON value.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the inner JSON value.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Convert a structured representation to JSON.
///
/// Tuples become arrays. Decimals are written as strings to keep their
/// precision. Dates, times, datetimes and files have no JSON form and must be
/// converted first.
pub fn value_to_json(value: &Value) -> Result<serde_json::Value, ConvertError> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => json!(i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| ConvertError::invalid(format!("{f} has no JSON representation")))?,
        Value::Decimal(d) => json!(d.to_string()),
        Value::String(s) => json!(s),
        Value::Boolean(b) => json!(b),
        Value::List(items) | Value::Tuple(items) => serde_json::Value::Array(
            items
                .iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| value_to_json(v).map(|json| (k.clone(), json)))
                .collect::<Result<serde_json::Map<_, _>, _>>()?,
        ),
        other => {
            return Err(ConvertError::UnexpectedValue {
                expected: "JSON-compatible value",
                found: other.kind(),
            })
        }
    };
    Ok(json)
}

impl TryFrom<Value> for JsonValue {
    type Error = ConvertError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value_to_json(&value).map(JsonValue)
    }
}

impl TryFrom<&Value> for JsonValue {
    type Error = ConvertError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value_to_json(value).map(JsonValue)
    }
}
