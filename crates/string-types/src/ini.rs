//! Structures ↔ INI text.
//!
//! [`IniConverter`] renders a whole document. Fields holding structures
//! become `[name]` sections, every other field is a `key = value` line ahead
//! of the first section:
//!
//! ```text
//! {name: "demo", b: {x: 4, y: [1, 2, 3]}}  ↔  name = demo
//!
//!                                              [b]
//!                                              x = 4
//!                                              y = 1,2,3
//! ```
//!
//! Section bodies are converted through the delegate at the section's path,
//! so a pattern such as `"*"` can select [`IniSectionConverter`] for them.
//! Keys are converted with the converter for their type. Null values are
//! left out and missing keys read back as null.

use crate::scalar::expect_text;
use crate::tuple::cell_text;
use convert_core::{Context, ConvertError, Converter, Field, Result, SchemaType, TypeTag, Value};
use std::collections::BTreeMap;

fn structure_fields<'s>(schema: &'s SchemaType, converter: &'static str) -> Result<&'s [Field]> {
    match schema {
        SchemaType::Structure { fields } => Ok(fields),
        other => Err(ConvertError::SchemaMismatch {
            converter,
            found: other.tag(),
        }),
    }
}

fn expect_map(value: &Value) -> Result<&BTreeMap<String, Value>> {
    value.as_map().ok_or(ConvertError::UnexpectedValue {
        expected: "map",
        found: value.kind(),
    })
}

fn is_header(line: &str) -> bool {
    line.trim_start().starts_with('[')
}

fn is_section(field: &Field) -> bool {
    field.field_type.tag() == TypeTag::Structure
}

/// `key = value` line for one field, or `None` when the value is null.
fn entry_line(field: &Field, value: &Value, ctx: &Context<'_>) -> Result<Option<String>> {
    let converted = ctx.from_child_by_type(&field.field_type, value, field.name.as_str())?;
    let Some(text) = cell_text(converted)? else {
        return Ok(None);
    };
    if text.contains('\n') {
        return Err(ConvertError::malformed(format!(
            "Invalid INI value for '{}': line breaks are not allowed",
            field.name
        )));
    }
    Ok(Some(format!("{} = {}", field.name, text.trim())))
}

/// Parse `key = value` lines, skipping blanks and `;` or `#` comments.
fn parse_entries(text: &str) -> Result<BTreeMap<String, String>> {
    let mut entries = BTreeMap::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if is_header(line) {
            return Err(ConvertError::malformed(format!(
                "Invalid INI line '{line}': nested sections are not supported"
            )));
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ConvertError::malformed(format!("Invalid INI line '{line}'")))?;
        entries.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(entries)
}

/// Read a field from its entry; empty and missing entries are null.
fn entry_value(
    field: &Field,
    entries: &BTreeMap<String, String>,
    ctx: &Context<'_>,
) -> Result<Value> {
    match entries.get(&field.name) {
        Some(text) if !text.is_empty() => ctx.to_child_by_type(
            &field.field_type,
            &Value::string(text.as_str()),
            field.name.as_str(),
        ),
        _ => Ok(Value::Null),
    }
}

/// One flat structure ↔ `key = value` lines.
///
/// Fields are converted with the converter for their type, so this can be
/// registered under a path pattern without catching its own fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniSectionConverter;

impl Converter for IniSectionConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let fields = structure_fields(schema, "IniSectionConverter")?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let map = expect_map(value)?;
        let null = Value::Null;
        let mut lines = Vec::with_capacity(fields.len());
        for field in fields {
            let item = map.get(&field.name).unwrap_or(&null);
            if let Some(line) = entry_line(field, item, ctx)? {
                lines.push(line);
            }
        }
        Ok(Value::String(lines.join("\n")))
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let fields = structure_fields(schema, "IniSectionConverter")?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let entries = parse_entries(expect_text(value)?)?;
        fields
            .iter()
            .map(|field| Ok((field.name.clone(), entry_value(field, &entries, ctx)?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Value::Map)
    }
}

/// Structure ↔ INI document with one section per structure field.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniConverter;

impl IniConverter {
    fn section(field: &Field, value: &Value, ctx: &Context<'_>) -> Result<Option<String>> {
        let converted = ctx.from_child(&field.field_type, value, field.name.as_str())?;
        let Some(body) = cell_text(converted)? else {
            return Ok(None);
        };
        let mut section = format!("[{}]\n", field.name);
        for line in body.lines() {
            if is_header(line) {
                return Err(ConvertError::malformed(format!(
                    "Invalid INI section '{}': nested sections are not supported",
                    field.name
                )));
            }
            section.push_str(line);
            section.push('\n');
        }
        Ok(Some(section))
    }

    /// Split a document into the lines before the first header and the body
    /// of each section.
    fn split_sections(text: &str) -> Result<(String, BTreeMap<String, String>)> {
        let mut preamble = String::new();
        let mut sections: BTreeMap<String, String> = BTreeMap::new();
        let mut current: Option<String> = None;
        for line in text.lines() {
            let trimmed = line.trim();
            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let name = name.trim().to_string();
                if sections.contains_key(&name) {
                    return Err(ConvertError::malformed(format!(
                        "Invalid INI: duplicate section '{name}'"
                    )));
                }
                sections.insert(name.clone(), String::new());
                current = Some(name);
                continue;
            }
            let body = match &current {
                Some(name) => sections.entry(name.clone()).or_default(),
                None => &mut preamble,
            };
            body.push_str(line);
            body.push('\n');
        }
        Ok((preamble, sections))
    }
}

impl Converter for IniConverter {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let fields = structure_fields(schema, "IniConverter")?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let map = expect_map(value)?;
        let null = Value::Null;

        let mut document = String::new();
        for field in fields.iter().filter(|f| !is_section(f)) {
            let item = map.get(&field.name).unwrap_or(&null);
            if let Some(line) = entry_line(field, item, ctx)? {
                document.push_str(&line);
                document.push('\n');
            }
        }
        for field in fields.iter().filter(|f| is_section(f)) {
            let item = map.get(&field.name).unwrap_or(&null);
            if let Some(section) = Self::section(field, item, ctx)? {
                if !document.is_empty() {
                    document.push('\n');
                }
                document.push_str(&section);
            }
        }
        Ok(Value::String(document))
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        let fields = structure_fields(schema, "IniConverter")?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let (preamble, sections) = Self::split_sections(expect_text(value)?)?;
        let entries = parse_entries(&preamble)?;

        let mut map = BTreeMap::new();
        for field in fields {
            let value = if !is_section(field) {
                entry_value(field, &entries, ctx)?
            } else if let Some(body) = sections.get(&field.name) {
                let body = Value::string(body.as_str());
                ctx.to_child(&field.field_type, &body, field.name.as_str())?
            } else {
                Value::Null
            };
            map.insert(field.name.clone(), value);
        }
        Ok(Value::Map(map))
    }
}
