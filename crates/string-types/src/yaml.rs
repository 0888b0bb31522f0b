//! Composite values ↔ one YAML document.
//!
//! Structures become mappings in field order, sequences and tuples become
//! YAML sequences. Every scalar leaf is converted to text through the
//! delegate at its own path and stored as a YAML string:
//!
//! ```text
//! {b: {x: 4, y: [1, 2, 3]}}  ↔  b:
//!                                 x: '4'
//!                                 y:
//!                                 - '1'
//!                                 - '2'
//!                                 - '3'
//! ```

use crate::scalar::expect_text;
use crate::tuple::{cell_text, check_arity};
use convert_core::{Context, ConvertError, Converter, PathSegment, Result, SchemaType, Value};
use serde_yaml::{Mapping, Value as Yaml};
use std::collections::BTreeMap;

fn unexpected(expected: &'static str, value: &Value) -> ConvertError {
    ConvertError::UnexpectedValue {
        expected,
        found: value.kind(),
    }
}

fn invalid_yaml(message: String) -> ConvertError {
    ConvertError::invalid(format!("Invalid YAML: {message}"))
}

/// Structure, sequence or tuple ↔ YAML text.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlConverter;

impl YamlConverter {
    fn check_composite(schema: &SchemaType) -> Result<()> {
        if schema.is_scalar() {
            return Err(ConvertError::SchemaMismatch {
                converter: "YamlConverter",
                found: schema.tag(),
            });
        }
        Ok(())
    }
}

/// Convert one child position: scalars through the delegate, composites
/// recursively under the child path.
fn child_to_yaml(
    schema: &SchemaType,
    value: &Value,
    segment: impl Into<PathSegment>,
    ctx: &Context<'_>,
) -> Result<Yaml> {
    if schema.is_scalar() {
        return Ok(match cell_text(ctx.from_child(schema, value, segment)?)? {
            Some(text) => Yaml::String(text),
            None => Yaml::Null,
        });
    }
    let path = ctx.path().child(segment);
    to_yaml(schema, value, &Context::new(ctx.delegate(), &path))
}

fn to_yaml(schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Yaml> {
    if value.is_null() {
        return Ok(Yaml::Null);
    }
    match schema {
        SchemaType::Structure { fields } => {
            let map = value.as_map().ok_or_else(|| unexpected("map", value))?;
            let null = Value::Null;
            let mut mapping = Mapping::new();
            for field in fields {
                let item = map.get(&field.name).unwrap_or(&null);
                let node = child_to_yaml(&field.field_type, item, field.name.as_str(), ctx)?;
                mapping.insert(Yaml::String(field.name.clone()), node);
            }
            Ok(Yaml::Mapping(mapping))
        }
        SchemaType::Sequence { element } => {
            let items = value.as_items().ok_or_else(|| unexpected("list", value))?;
            items
                .iter()
                .enumerate()
                .map(|(n, item)| child_to_yaml(element, item, n, ctx))
                .collect::<Result<Vec<_>>>()
                .map(Yaml::Sequence)
        }
        SchemaType::Tuple { elements } => {
            let items = value.as_items().ok_or_else(|| unexpected("tuple", value))?;
            check_arity(elements.len(), items.len())?;
            elements
                .iter()
                .zip(items)
                .enumerate()
                .map(|(n, (element, item))| child_to_yaml(element, item, n, ctx))
                .collect::<Result<Vec<_>>>()
                .map(Yaml::Sequence)
        }
        scalar => Err(ConvertError::SchemaMismatch {
            converter: "YamlConverter",
            found: scalar.tag(),
        }),
    }
}

/// Text of a scalar node. Unquoted numbers and booleans are read back as
/// the text the string converters produce for them.
fn leaf_text(node: &Yaml) -> Result<Value> {
    match node {
        Yaml::Null => Ok(Value::Null),
        Yaml::String(s) => Ok(Value::string(s.as_str())),
        Yaml::Number(n) => Ok(Value::String(n.to_string())),
        Yaml::Bool(true) => Ok(Value::string("True")),
        Yaml::Bool(false) => Ok(Value::string("False")),
        _ => Err(invalid_yaml("expected a scalar".to_string())),
    }
}

fn child_from_yaml(
    schema: &SchemaType,
    node: &Yaml,
    segment: impl Into<PathSegment>,
    ctx: &Context<'_>,
) -> Result<Value> {
    if schema.is_scalar() {
        return ctx.to_child(schema, &leaf_text(node)?, segment);
    }
    let path = ctx.path().child(segment);
    from_yaml(schema, node, &Context::new(ctx.delegate(), &path))
}

fn from_yaml(schema: &SchemaType, node: &Yaml, ctx: &Context<'_>) -> Result<Value> {
    if node.is_null() {
        return Ok(Value::Null);
    }
    match schema {
        SchemaType::Structure { fields } => {
            let mapping = node
                .as_mapping()
                .ok_or_else(|| invalid_yaml(format!("expected a mapping at '{}'", ctx.path())))?;
            let null = Yaml::Null;
            let mut map = BTreeMap::new();
            for field in fields {
                let child = mapping.get(field.name.as_str()).unwrap_or(&null);
                let value = child_from_yaml(&field.field_type, child, field.name.as_str(), ctx)?;
                map.insert(field.name.clone(), value);
            }
            Ok(Value::Map(map))
        }
        SchemaType::Sequence { element } => {
            let nodes = node
                .as_sequence()
                .ok_or_else(|| invalid_yaml(format!("expected a sequence at '{}'", ctx.path())))?;
            nodes
                .iter()
                .enumerate()
                .map(|(n, child)| child_from_yaml(element, child, n, ctx))
                .collect::<Result<Vec<_>>>()
                .map(Value::List)
        }
        SchemaType::Tuple { elements } => {
            let nodes = node
                .as_sequence()
                .ok_or_else(|| invalid_yaml(format!("expected a sequence at '{}'", ctx.path())))?;
            check_arity(elements.len(), nodes.len())?;
            elements
                .iter()
                .zip(nodes)
                .enumerate()
                .map(|(n, (element, child))| child_from_yaml(element, child, n, ctx))
                .collect::<Result<Vec<_>>>()
                .map(Value::Tuple)
        }
        scalar => Err(ConvertError::SchemaMismatch {
            converter: "YamlConverter",
            found: scalar.tag(),
        }),
    }
}

impl Converter for YamlConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        Self::check_composite(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let document = to_yaml(schema, value, ctx)?;
        serde_yaml::to_string(&document)
            .map(Value::String)
            .map_err(|e| invalid_yaml(e.to_string()))
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        Self::check_composite(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let document: Yaml =
            serde_yaml::from_str(expect_text(value)?).map_err(|e| invalid_yaml(e.to_string()))?;
        from_yaml(schema, &document, ctx)
    }
}
