//! The conversion entry point.
//!
//! A [`Facade`] owns a registry and the converter options. Each call resolves
//! a converter for the schema type at the current path and hands it a
//! [`Context`] pointing back at the facade, so composite converters recurse
//! through the same resolution.

use crate::presets::Preset;
use crate::registry::{Registry, RegistryError, RegistryKey};
use convert_core::{
    Context, Converter, ConverterOptions, Delegate, Result, SchemaType, StructuralPath, TypeTag,
    Value,
};
use json_types::{json_to_value, value_to_json};
use std::sync::Arc;

/// Registry plus options, converting values in both directions.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct Facade {
    registry: Arc<Registry>,
    options: ConverterOptions,
}

impl Facade {
    /// Create a facade with default options.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            options: ConverterOptions::default(),
        }
    }

    /// Create a facade with the given options.
    pub fn with_options(
        registry: Registry,
        options: ConverterOptions,
    ) -> std::result::Result<Self, RegistryError> {
        options.validate()?;
        Ok(Self {
            registry: Arc::new(registry),
            options,
        })
    }

    /// Facade over the text preset.
    pub fn string() -> Self {
        Self::new(Registry::string_defaults())
    }

    /// Facade over the JSON-like preset.
    pub fn json() -> Self {
        Self::new(Registry::json_defaults())
    }

    pub fn builder() -> FacadeBuilder {
        FacadeBuilder::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Convert an internal value to its external representation.
    pub fn convert_from(&self, schema: &SchemaType, value: &Value) -> Result<Value> {
        self.convert_from_at(schema, value, &StructuralPath::root())
    }

    /// Convert an external representation back to an internal value.
    pub fn convert_to(&self, schema: &SchemaType, value: &Value) -> Result<Value> {
        self.convert_to_at(schema, value, &StructuralPath::root())
    }

    /// Convert an internal value found at `path`.
    pub fn convert_from_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        let converter = self.registry.resolve(schema, path)?;
        converter.from_type(schema, value, &Context::new(self, path))
    }

    /// Convert an external representation found at `path`.
    pub fn convert_to_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        let converter = self.registry.resolve(schema, path)?;
        converter.to_type(schema, value, &Context::new(self, path))
    }

    /// Convert an internal value at `path` with the converter for its type,
    /// ignoring path patterns.
    pub fn convert_from_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        let converter = self.registry.resolve_type(schema, path)?;
        converter.from_type(schema, value, &Context::new(self, path))
    }

    /// Inverse of [`convert_from_by_type`](Self::convert_from_by_type).
    pub fn convert_to_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        let converter = self.registry.resolve_type(schema, path)?;
        converter.to_type(schema, value, &Context::new(self, path))
    }

    /// Convert an internal value and render the result as JSON.
    ///
    /// Meant for registries whose output is JSON-compatible, such as the
    /// JSON-like preset.
    pub fn to_json(&self, schema: &SchemaType, value: &Value) -> Result<serde_json::Value> {
        value_to_json(&self.convert_from(schema, value)?)
    }

    /// Read a JSON value and convert it back to an internal value.
    pub fn from_json(&self, schema: &SchemaType, json: serde_json::Value) -> Result<Value> {
        self.convert_to(schema, &json_to_value(json))
    }
}

impl Default for Facade {
    fn default() -> Self {
        Self::string()
    }
}

impl Delegate for Facade {
    fn convert_from_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        Facade::convert_from_at(self, schema, value, path)
    }

    fn convert_to_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        Facade::convert_to_at(self, schema, value, path)
    }

    fn convert_from_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        Facade::convert_from_by_type(self, schema, value, path)
    }

    fn convert_to_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        Facade::convert_to_by_type(self, schema, value, path)
    }

    fn options(&self) -> &ConverterOptions {
        &self.options
    }
}

/// A facade registered inside another registry converts with its own
/// registry and options; the path carries on from the outer conversion.
impl Converter for Facade {
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        self.convert_from_at(schema, value, ctx.path())
    }

    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value> {
        self.convert_to_at(schema, value, ctx.path())
    }
}

/// Builder for [`Facade`], starting from a preset.
#[derive(Debug, Default)]
pub struct FacadeBuilder {
    preset: Preset,
    options: ConverterOptions,
    overrides: Vec<(RegistryKey, Arc<dyn Converter>)>,
}

impl FacadeBuilder {
    /// Start from the given preset instead of the text one.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn options(mut self, options: ConverterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Override the converter for a type tag.
    pub fn type_converter(mut self, tag: TypeTag, converter: impl Converter + 'static) -> Self {
        self.overrides
            .push((RegistryKey::Type(tag), Arc::new(converter)));
        self
    }

    /// Override the converter for a path pattern.
    pub fn path_converter(mut self, pattern: &str, converter: impl Converter + 'static) -> Self {
        self.overrides
            .push((RegistryKey::Path(pattern.to_string()), Arc::new(converter)));
        self
    }

    /// Add an override that is already shared.
    pub fn override_with(mut self, key: RegistryKey, converter: Arc<dyn Converter>) -> Self {
        self.overrides.push((key, converter));
        self
    }

    /// Build the registry and validate the options.
    pub fn build(self) -> std::result::Result<Facade, RegistryError> {
        let mut registry = self.preset.registry();
        registry.extend(self.overrides)?;
        tracing::debug!(
            "Built {:?} facade with {} override pattern(s), delimiter {:?}",
            self.preset,
            registry.patterns().count(),
            self.options.delimiter
        );
        Facade::with_options(registry, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convert_core::ConvertError;

    #[test]
    fn test_root_and_nested_paths() {
        let facade = Facade::string();
        let schema = SchemaType::tuple(vec![SchemaType::Integer, SchemaType::Boolean]);
        let value = Value::Tuple(vec![Value::Integer(1), Value::Boolean(false)]);
        assert_eq!(
            facade.convert_from(&schema, &value).unwrap(),
            Value::string("1,False")
        );
        assert_eq!(
            facade
                .convert_to(&schema, &Value::string("1,False"))
                .unwrap(),
            value
        );
    }

    #[test]
    fn test_missing_converter_reports_path() {
        let facade = Facade::string();
        let schema = SchemaType::sequence(SchemaType::structure([("a", SchemaType::Integer)]));
        let err = facade
            .convert_from(&schema, &Value::List(vec![Value::map([("a", Value::Integer(1))])]))
            .unwrap_err();
        assert_eq!(
            err,
            ConvertError::NoConverterFound {
                tag: TypeTag::Structure,
                path: StructuralPath::from_segments([0usize]),
            }
        );
    }

    #[test]
    fn test_builder_validates_options() {
        let err = Facade::builder().delimiter('"').build().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidOptions(_)));

        let err = Facade::builder()
            .path_converter("a..b", Facade::json())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
    }

    #[test]
    fn test_delimiter_reaches_converters() {
        let facade = Facade::builder().delimiter('|').build().unwrap();
        let schema = SchemaType::sequence(SchemaType::String);
        let value = Value::List(vec![Value::string("a|b"), Value::string("c,d")]);
        let text = facade.convert_from(&schema, &value).unwrap();
        assert_eq!(text, Value::string("\"a|b\"|c,d"));
        assert_eq!(facade.convert_to(&schema, &text).unwrap(), value);
    }
}
