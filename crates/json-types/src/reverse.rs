//! Reverse conversion: JSON value → structured representation.

use crate::forward::JsonValue;
use convert_core::Value;

/// Convert a JSON value to the representation the structured converters
/// read.
///
/// Numbers become integers when they fit in an `i64` and floats otherwise.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        json_to_value(json.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_conversion() {
        assert_eq!(json_to_value(json!(null)), Value::Null);
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(json_to_value(json!(42)), Value::Integer(42));
        assert_eq!(json_to_value(json!(-7)), Value::Integer(-7));
        assert_eq!(json_to_value(json!(2.5)), Value::Float(2.5));
        assert_eq!(json_to_value(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn test_object_conversion() {
        let value: Value = JsonValue(json!({
            "type": "time",
            "hour": 1,
            "tags": ["a", true]
        }))
        .into();
        assert_eq!(
            value,
            Value::map([
                ("type", Value::string("time")),
                ("hour", Value::Integer(1)),
                (
                    "tags",
                    Value::List(vec![Value::string("a"), Value::Boolean(true)])
                ),
            ])
        );
    }

    #[test]
    fn test_parsed_text() {
        let jv: JsonValue = serde_json::from_str(r#"[1, "2", null]"#).unwrap();
        assert_eq!(
            Value::from(jv),
            Value::List(vec![Value::Integer(1), Value::string("2"), Value::Null])
        );
    }
}
