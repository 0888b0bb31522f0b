//! Test support: a delegate that dispatches on the schema type alone.
//!
//! Converter crates cannot depend on the facade without a cycle, so their
//! unit tests resolve child converters through this instead.

use crate::converter::{Context, Converter, Delegate};
use crate::error::{ConvertError, Result};
use crate::options::ConverterOptions;
use crate::path::StructuralPath;
use crate::types::SchemaType;
use crate::values::Value;
use std::sync::Mutex;

type Lookup = dyn Fn(&SchemaType) -> Option<&'static dyn Converter> + Send + Sync;

/// Delegate resolving converters with a plain function of the schema type.
///
/// Resolution never looks at the path, so the by-type conversions are the
/// same as the path-aware ones.
///
/// Every path it is asked to convert at is recorded, so tests can assert on
/// path threading.
pub struct DispatchDelegate {
    lookup: Box<Lookup>,
    options: ConverterOptions,
    visited: Mutex<Vec<String>>,
}

impl DispatchDelegate {
    pub fn new(
        lookup: impl Fn(&SchemaType) -> Option<&'static dyn Converter> + Send + Sync + 'static,
    ) -> Self {
        Self {
            lookup: Box::new(lookup),
            options: ConverterOptions::default(),
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn with_options(mut self, options: ConverterOptions) -> Self {
        self.options = options;
        self
    }

    /// Keys of every path visited so far, in call order.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn resolve(&self, schema: &SchemaType, path: &StructuralPath) -> Result<&'static dyn Converter> {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.key());
        }
        (self.lookup)(schema).ok_or_else(|| ConvertError::NoConverterFound {
            tag: schema.tag(),
            path: path.clone(),
        })
    }

    /// Convert at the root path.
    pub fn from_type(&self, schema: &SchemaType, value: &Value) -> Result<Value> {
        self.convert_from_at(schema, value, &StructuralPath::root())
    }

    /// Convert back at the root path.
    pub fn to_type(&self, schema: &SchemaType, value: &Value) -> Result<Value> {
        self.convert_to_at(schema, value, &StructuralPath::root())
    }
}

impl Delegate for DispatchDelegate {
    fn convert_from_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        let converter = self.resolve(schema, path)?;
        converter.from_type(schema, value, &Context::new(self, path))
    }

    fn convert_to_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        let converter = self.resolve(schema, path)?;
        converter.to_type(schema, value, &Context::new(self, path))
    }

    fn convert_from_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        self.convert_from_at(schema, value, path)
    }

    fn convert_to_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value> {
        self.convert_to_at(schema, value, path)
    }

    fn options(&self) -> &ConverterOptions {
        &self.options
    }
}
