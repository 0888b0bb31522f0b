//! Container conversions that keep the shape and convert element-wise.
//!
//! Used when the target represents lists and maps natively, so only the
//! leaves change:
//!
//! ```text
//! [[1, 2], [3]]  ↔  [["1", "2"], ["3"]]
//! ```

use convert_core::{Context, ConvertError, Converter, Result, SchemaType, Value};
use std::collections::BTreeMap;
use string_types::check_arity;

fn expect_items<'v>(value: &'v Value, expected: &'static str) -> Result<&'v [Value]> {
    value.as_items().ok_or(ConvertError::UnexpectedValue {
        expected,
        found: value.kind(),
    })
}

fn mismatch(converter: &'static str, schema: &SchemaType) -> ConvertError {
    ConvertError::SchemaMismatch {
        converter,
        found: schema.tag(),
    }
}

/// Sequence ↔ list, converting each element through the delegate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceListConverter;

impl Converter for SequenceListConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let element = schema
            .element()
            .ok_or_else(|| mismatch("SequenceListConverter", schema))?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        expect_items(value, "list")?
            .iter()
            .enumerate()
            .map(|(n, item)| ctx.from_child(element, item, n))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let element = schema
            .element()
            .ok_or_else(|| mismatch("SequenceListConverter", schema))?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        expect_items(value, "list")?
            .iter()
            .enumerate()
            .map(|(n, item)| ctx.to_child(element, item, n))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }
}

/// Tuple ↔ ordered list of the same arity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TupleListConverter;

impl TupleListConverter {
    fn elements<'s>(schema: &'s SchemaType) -> Result<&'s [SchemaType]> {
        schema
            .elements()
            .ok_or_else(|| mismatch("TupleListConverter", schema))
    }
}

impl Converter for TupleListConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let elements = Self::elements(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let items = expect_items(value, "tuple")?;
        check_arity(elements.len(), items.len())?;
        elements
            .iter()
            .zip(items)
            .enumerate()
            .map(|(n, (element, item))| ctx.from_child(element, item, n))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let elements = Self::elements(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let items = expect_items(value, "list")?;
        check_arity(elements.len(), items.len())?;
        elements
            .iter()
            .zip(items)
            .enumerate()
            .map(|(n, (element, item))| ctx.to_child(element, item, n))
            .collect::<Result<Vec<_>>>()
            .map(Value::Tuple)
    }
}

/// Structure ↔ map, converting each declared field through the delegate.
///
/// Missing fields convert as `Null`; keys not declared by the structure are
/// dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructureMapConverter;

impl StructureMapConverter {
    fn convert(
        schema: &SchemaType,
        value: &Value,
        convert_field: impl Fn(&SchemaType, &Value, &str) -> Result<Value>,
    ) -> Result<Value> {
        let fields = schema
            .fields()
            .ok_or_else(|| mismatch("StructureMapConverter", schema))?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let map = value.as_map().ok_or(ConvertError::UnexpectedValue {
            expected: "map",
            found: value.kind(),
        })?;

        let null = Value::Null;
        let mut out = BTreeMap::new();
        for field in fields {
            let field_value = map.get(&field.name).unwrap_or(&null);
            let converted = convert_field(&field.field_type, field_value, &field.name)?;
            out.insert(field.name.clone(), converted);
        }
        Ok(Value::Map(out))
    }
}

impl Converter for StructureMapConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        Self::convert(schema, value, |ty, v, name| ctx.from_child(ty, v, name))
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        Self::convert(schema, value, |ty, v, name| ctx.to_child(ty, v, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convert_core::testing::DispatchDelegate;
    use convert_core::TypeTag;
    use string_types::IntegerToStringConverter;

    fn lookup(schema: &SchemaType) -> Option<&'static dyn Converter> {
        match schema.tag() {
            TypeTag::Integer => Some(&IntegerToStringConverter),
            TypeTag::Sequence => Some(&SequenceListConverter),
            TypeTag::Tuple => Some(&TupleListConverter),
            TypeTag::Structure => Some(&StructureMapConverter),
            _ => None,
        }
    }

    fn ints(values: &[i64]) -> Value {
        Value::List(values.iter().copied().map(Value::Integer).collect())
    }

    fn texts(values: &[&str]) -> Value {
        Value::List(values.iter().map(|v| Value::string(*v)).collect())
    }

    #[test]
    fn test_nested_sequences_convert_leaves() {
        let delegate = DispatchDelegate::new(lookup);
        let schema = SchemaType::sequence(SchemaType::sequence(SchemaType::Integer));
        let value = Value::List(vec![ints(&[1, 2]), ints(&[3])]);
        let converted = delegate.from_type(&schema, &value).unwrap();
        assert_eq!(
            converted,
            Value::List(vec![texts(&["1", "2"]), texts(&["3"])])
        );
        assert_eq!(delegate.to_type(&schema, &converted).unwrap(), value);
        let visits = ["", "0", "0.0", "0.1", "1", "1.0"];
        assert_eq!(delegate.visited(), [visits, visits].concat());
    }

    #[test]
    fn test_tuple_to_list() {
        let delegate = DispatchDelegate::new(lookup);
        let schema = SchemaType::tuple(vec![SchemaType::Integer, SchemaType::Integer]);
        let tuple = Value::Tuple(vec![Value::Integer(1), Value::Null]);
        let list = delegate.from_type(&schema, &tuple).unwrap();
        assert_eq!(list, Value::List(vec![Value::string("1"), Value::Null]));
        assert_eq!(delegate.to_type(&schema, &list).unwrap(), tuple);

        let err = delegate.to_type(&schema, &texts(&["1"])).unwrap_err();
        assert!(matches!(err, ConvertError::ArityMismatch(_)));
    }

    #[test]
    fn test_structure_fields() {
        let delegate = DispatchDelegate::new(lookup);
        let schema = SchemaType::structure([
            ("a", SchemaType::Integer),
            ("b", SchemaType::sequence(SchemaType::Integer)),
            ("c", SchemaType::Integer),
        ]);
        let value = Value::map([
            ("a", Value::Integer(1)),
            ("b", ints(&[2, 3])),
            ("extra", Value::Boolean(true)),
        ]);
        let converted = delegate.from_type(&schema, &value).unwrap();
        assert_eq!(
            converted,
            Value::map([
                ("a", Value::string("1")),
                ("b", texts(&["2", "3"])),
                ("c", Value::Null),
            ])
        );
        assert_eq!(delegate.visited(), vec!["", "a", "b", "b.0", "b.1", "c"]);
    }

    #[test]
    fn test_wrong_shapes() {
        let delegate = DispatchDelegate::new(lookup);
        let schema = SchemaType::sequence(SchemaType::Integer);
        let err = delegate.from_type(&schema, &Value::Integer(1)).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnexpectedValue {
                expected: "list",
                found: "integer"
            }
        );
        assert_eq!(delegate.from_type(&schema, &Value::Null).unwrap(), Value::Null);
    }
}
