//! Core types for the schema-convert framework.
//!
//! This crate provides the foundational types shared by every converter
//! crate:
//!
//! - [`SchemaType`] - Read-only description of a value's shape
//! - [`TypeTag`] - Registry keys, with an explicit specificity order
//! - [`Value`] - Internal values and external representations alike
//! - [`StructuralPath`] - Position of a value inside nested data
//! - [`Converter`] - The bidirectional conversion contract
//! - [`ConvertError`] - The error taxonomy every converter reports through
//!
//! # Architecture
//!
//! ```text
//! convert-core (this crate)
//!    │
//!    ├─── string-types    (scalar codec, CSV rows, sequence/tuple text)
//!    ├─── json-types      (tagged maps, list identities, serde_json interop)
//!    │
//!    └─── schema-convert  (registry, resolver, facade)
//! ```

pub mod converter;
pub mod error;
pub mod options;
pub mod path;
pub mod types;
pub mod values;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports for convenience
pub use converter::{Context, Converter, Delegate};
pub use error::{ConvertError, Result};
pub use options::{ConverterOptions, OptionsError, DEFAULT_DELIMITER};
pub use path::{PathSegment, StructuralPath};
pub use types::{Field, SchemaType, TypeTag};
pub use values::{DateTimeValue, FileValue, TimeValue, UtcOffset, Value};
