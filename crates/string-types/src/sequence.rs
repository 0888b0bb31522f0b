//! Sequence ↔ CSV text.
//!
//! A sequence of scalars is one CSV row. A sequence of sequences or tuples is
//! one row per outer element, joined with `\n`:
//!
//! ```text
//! [[1, 2, 3], [4, 5, 6]]  ↔  "1,2,3\n4,5,6"
//! ```

use crate::csv_row::{decode_row, encode_row, MULTIPLE_LINES};
use crate::scalar::expect_text;
use crate::tuple::{cell_text, tuple_from_cells, tuple_to_cells};
use convert_core::{Context, ConvertError, Converter, Result, SchemaType, Value};

fn expect_items<'v>(value: &'v Value, expected: &'static str) -> Result<&'v [Value]> {
    value.as_items().ok_or(ConvertError::UnexpectedValue {
        expected,
        found: value.kind(),
    })
}

/// Variable-length sequence ↔ CSV text using the configured delimiter.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceToStringConverter;

impl SequenceToStringConverter {
    fn element<'s>(schema: &'s SchemaType) -> Result<&'s SchemaType> {
        schema.element().ok_or(ConvertError::SchemaMismatch {
            converter: "SequenceToStringConverter",
            found: schema.tag(),
        })
    }

    /// Render one outer element of a sequence of rows.
    fn line_from_type(element: &SchemaType, line: &Value, ctx: &Context<'_>) -> Result<String> {
        let cells = match element {
            SchemaType::Sequence { element: inner } => expect_items(line, "list")?
                .iter()
                .enumerate()
                .map(|(n, item)| cell_text(ctx.from_child(inner, item, n)?))
                .collect::<Result<Vec<_>>>()?,
            SchemaType::Tuple { elements } => {
                tuple_to_cells(elements, expect_items(line, "tuple")?, ctx)?
            }
            other => {
                return Err(ConvertError::SchemaMismatch {
                    converter: "SequenceToStringConverter",
                    found: other.tag(),
                })
            }
        };
        encode_row(&cells, ctx.options().delimiter_byte())
    }

    /// Parse one line of a sequence of rows.
    fn line_to_type(element: &SchemaType, line: &str, ctx: &Context<'_>) -> Result<Value> {
        let cells = decode_row(line, ctx.options().delimiter_byte())?;
        match element {
            SchemaType::Sequence { element: inner } => cells
                .iter()
                .enumerate()
                .map(|(n, cell)| ctx.to_child(inner, &Value::string(cell.as_str()), n))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            SchemaType::Tuple { elements } => {
                tuple_from_cells(elements, &cells, ctx).map(Value::Tuple)
            }
            other => Err(ConvertError::SchemaMismatch {
                converter: "SequenceToStringConverter",
                found: other.tag(),
            }),
        }
    }
}

impl Converter for SequenceToStringConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let element = Self::element(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let items = expect_items(value, "list")?;

        if element.is_row_like() {
            let lines = items
                .iter()
                .enumerate()
                .map(|(n, line)| {
                    if line.is_null() {
                        return Err(ConvertError::UnexpectedValue {
                            expected: "list",
                            found: line.kind(),
                        });
                    }
                    let line_path = ctx.path().child(n);
                    let line_ctx = Context::new(ctx.delegate(), &line_path);
                    Self::line_from_type(element, line, &line_ctx)
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::String(lines.join("\n")));
        }

        let cells = items
            .iter()
            .enumerate()
            .map(|(n, item)| cell_text(ctx.from_child(element, item, n)?))
            .collect::<Result<Vec<_>>>()?;
        encode_row(&cells, ctx.options().delimiter_byte()).map(Value::String)
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let element = Self::element(schema)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let text = expect_text(value)?.trim();
        if text.is_empty() {
            return Ok(Value::List(Vec::new()));
        }

        if element.is_row_like() {
            return text
                .split('\n')
                .enumerate()
                .map(|(n, line)| {
                    let line_path = ctx.path().child(n);
                    let line_ctx = Context::new(ctx.delegate(), &line_path);
                    Self::line_to_type(element, line, &line_ctx)
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::List);
        }

        let delimiter = ctx.options().delimiter;
        let cells = if delimiter == '\n' {
            text.lines().map(str::to_string).collect()
        } else if text.contains('\n') {
            return Err(ConvertError::malformed(MULTIPLE_LINES));
        } else {
            decode_row(text, ctx.options().delimiter_byte())?
        };

        cells
            .into_iter()
            .enumerate()
            .map(|(n, cell)| ctx.to_child(element, &Value::String(cell), n))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }
}
