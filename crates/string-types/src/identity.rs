use convert_core::{Context, Converter, Result, SchemaType, Value};

/// Returns the value unchanged in both directions.
///
/// The default for String in the text preset, and for every kind a target
/// represents natively.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityConverter;

impl Converter for IdentityConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        Ok(value.clone())
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        Ok(value.clone())
    }
}
