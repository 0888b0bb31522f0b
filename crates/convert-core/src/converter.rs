//! The converter contract.
//!
//! A converter turns an internal value into its external representation
//! (`from_type`) and back (`to_type`). Composite converters recurse into their
//! children through the [`Delegate`], which re-resolves the converter for
//! each child position.

use crate::error::Result;
use crate::options::ConverterOptions;
use crate::path::{PathSegment, StructuralPath};
use crate::types::SchemaType;
use crate::values::Value;
use std::fmt;

/// The entry point child conversions are delegated to.
///
/// Implemented by the facade, which resolves a converter for the given type
/// and path and threads itself back in through a fresh [`Context`].
pub trait Delegate {
    /// Convert an internal value at `path` to its external representation.
    fn convert_from_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value>;

    /// Convert an external representation at `path` back to an internal value.
    fn convert_to_at(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value>;

    /// Like [`convert_from_at`](Self::convert_from_at), but resolves by schema
    /// type alone; path patterns are not consulted.
    fn convert_from_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value>;

    /// Like [`convert_to_at`](Self::convert_to_at), but resolves by schema
    /// type alone.
    fn convert_to_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        path: &StructuralPath,
    ) -> Result<Value>;

    /// Options in effect for this delegate.
    fn options(&self) -> &ConverterOptions;
}

/// Per-call state handed to a converter: the delegate to recurse through,
/// the current structural path and the converter options.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    delegate: &'a dyn Delegate,
    path: &'a StructuralPath,
    options: &'a ConverterOptions,
}

impl<'a> Context<'a> {
    /// Create a context; options are taken from the delegate.
    pub fn new(delegate: &'a dyn Delegate, path: &'a StructuralPath) -> Self {
        Self {
            delegate,
            path,
            options: delegate.options(),
        }
    }

    pub fn path(&self) -> &'a StructuralPath {
        self.path
    }

    pub fn options(&self) -> &'a ConverterOptions {
        self.options
    }

    pub fn delegate(&self) -> &'a dyn Delegate {
        self.delegate
    }

    /// Convert a child value through the delegate, appending `segment` to the path.
    pub fn from_child(
        &self,
        schema: &SchemaType,
        value: &Value,
        segment: impl Into<PathSegment>,
    ) -> Result<Value> {
        let path = self.path.child(segment);
        tracing::trace!("delegating from_type for {schema} at {path}");
        self.delegate.convert_from_at(schema, value, &path)
    }

    /// Convert a child representation back through the delegate, appending
    /// `segment` to the path.
    pub fn to_child(
        &self,
        schema: &SchemaType,
        value: &Value,
        segment: impl Into<PathSegment>,
    ) -> Result<Value> {
        let path = self.path.child(segment);
        tracing::trace!("delegating to_type for {schema} at {path}");
        self.delegate.convert_to_at(schema, value, &path)
    }

    /// Convert a child value with the converter registered for its type,
    /// ignoring path patterns.
    ///
    /// Lets a converter registered under a pattern such as `"*"` convert its
    /// own children, which the same pattern would otherwise match.
    pub fn from_child_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        segment: impl Into<PathSegment>,
    ) -> Result<Value> {
        let path = self.path.child(segment);
        tracing::trace!("delegating from_type by type for {schema} at {path}");
        self.delegate.convert_from_by_type(schema, value, &path)
    }

    /// Inverse of [`from_child_by_type`](Self::from_child_by_type).
    pub fn to_child_by_type(
        &self,
        schema: &SchemaType,
        value: &Value,
        segment: impl Into<PathSegment>,
    ) -> Result<Value> {
        let path = self.path.child(segment);
        tracing::trace!("delegating to_type by type for {schema} at {path}");
        self.delegate.convert_to_by_type(schema, value, &path)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("path", self.path)
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

/// A bidirectional conversion unit for one schema kind or path.
///
/// Converters are stateless or hold configuration only, so one instance can
/// serve any number of concurrent conversions. Every converter maps
/// `Value::Null` to `Value::Null` in both directions unless it documents
/// otherwise.
pub trait Converter: Send + Sync + fmt::Debug {
    /// Internal value to external representation.
    fn from_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value>;

    /// External representation to internal value.
    fn to_type(&self, schema: &SchemaType, value: &Value, ctx: &Context<'_>) -> Result<Value>;
}
