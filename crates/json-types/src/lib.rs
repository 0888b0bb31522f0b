//! Structured (JSON-like) conversions for convert-core values.
//!
//! This crate provides converters for targets that represent lists and maps
//! natively, plus interop between their output and `serde_json`.
//!
//! # Modules
//!
//! - [`tagged`] - Date/time ↔ tagged maps
//! - [`list`] - Sequence, tuple and structure ↔ list/map, element-wise
//! - [`triple`] - Date ↔ `(year, month, day)`
//! - [`forward`] - Structured representation → JSON value
//! - [`reverse`] - JSON value → structured representation
//!
//! # Example
//!
//! ```ignore
//! use json_types::JsonValue;
//! use convert_core::{SchemaType, Value};
//!
//! // Forward: date → tagged map → JSON
//! let map = facade.convert_from(&SchemaType::Date, &date)?;
//! let json = JsonValue::try_from(map)?;
//!
//! // Reverse: JSON → tagged map → date
//! let map = Value::from(json);
//! let date = facade.convert_to(&SchemaType::Date, &map)?;
//! ```

pub mod forward;
pub mod list;
pub mod reverse;
pub mod tagged;
pub mod triple;

pub use forward::{value_to_json, JsonValue};
pub use list::{SequenceListConverter, StructureMapConverter, TupleListConverter};
pub use reverse::json_to_value;
pub use tagged::{DateToTaggedMapConverter, TimeToTaggedMapConverter, TYPE_KEY};
pub use triple::DateTripleConverter;
