//! Tuple ↔ one CSV row.

use crate::csv_row::{decode_row, encode_row};
use crate::scalar::expect_text;
use convert_core::{Context, ConvertError, Converter, Result, SchemaType, Value};

/// Text of a converted cell; `Null` becomes an empty cell.
pub(crate) fn cell_text(value: Value) -> Result<Option<String>> {
    match value {
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(ConvertError::UnexpectedValue {
            expected: "string",
            found: other.kind(),
        }),
    }
}

/// Fail with `ArityMismatch` unless `found` equals the declared arity.
pub fn check_arity(expected: usize, found: usize) -> Result<()> {
    if found > expected {
        return Err(ConvertError::arity(format!(
            "Too many arguments: expected {expected}, found {found}"
        )));
    }
    if found < expected {
        return Err(ConvertError::arity(format!(
            "Too few arguments: expected {expected}, found {found}"
        )));
    }
    Ok(())
}

/// Convert tuple items to text cells, one per element type.
pub(crate) fn tuple_to_cells(
    elements: &[SchemaType],
    items: &[Value],
    ctx: &Context<'_>,
) -> Result<Vec<Option<String>>> {
    check_arity(elements.len(), items.len())?;
    elements
        .iter()
        .zip(items)
        .enumerate()
        .map(|(n, (element, item))| cell_text(ctx.from_child(element, item, n)?))
        .collect()
}

/// Convert text cells back to tuple items.
///
/// A cell that is empty after trimming becomes `Null` without reaching the
/// element converter.
pub(crate) fn tuple_from_cells(
    elements: &[SchemaType],
    cells: &[String],
    ctx: &Context<'_>,
) -> Result<Vec<Value>> {
    check_arity(elements.len(), cells.len())?;
    elements
        .iter()
        .zip(cells)
        .enumerate()
        .map(|(n, (element, cell))| {
            let cell = cell.trim();
            if cell.is_empty() {
                Ok(Value::Null)
            } else {
                ctx.to_child(element, &Value::string(cell), n)
            }
        })
        .collect()
}

/// Fixed-arity tuple ↔ one CSV row using the configured delimiter.
///
/// ```text
/// (None, "foo")  ↔  ",foo"
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TupleToStringConverter;

impl TupleToStringConverter {
    fn elements<'s>(schema: &'s SchemaType) -> Result<&'s [SchemaType]> {
        schema.elements().ok_or(ConvertError::SchemaMismatch {
            converter: "TupleToStringConverter",
            found: schema.tag(),
        })
    }
}

impl Converter for TupleToStringConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let elements = Self::elements(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let items = value.as_items().ok_or(ConvertError::UnexpectedValue {
            expected: "tuple",
            found: value.kind(),
        })?;
        let cells = tuple_to_cells(elements, items, ctx)?;
        encode_row(&cells, ctx.options().delimiter_byte()).map(Value::String)
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let elements = Self::elements(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let text = expect_text(value)?.trim();
        let cells = decode_row(text, ctx.options().delimiter_byte())?;
        tuple_from_cells(elements, &cells, ctx).map(Value::Tuple)
    }
}
