//! Schema Convert Library
//!
//! Schema-driven conversion of typed values to and from external
//! representations such as CSV-style text and JSON-like structures.
//!
//! # Features
//!
//! - Bidirectional: every converter renders and parses back
//! - Composite types: sequences, tuples and structures recurse through the registry
//! - Path overrides: pick a converter for one position inside a nested value
//! - Presets: a text registry and a JSON-like registry out of the box
//! - Declarative setup: build a facade from YAML or TOML
//!
//! # Type Crates
//!
//! - `convert_core` - Schema types, values, paths and the converter contract
//! - `string_types` - Text and CSV converters
//! - `json_types` - List/map converters and `serde_json` interop
//!
//! # Usage
//!
//! ```ignore
//! use schema_convert::{Facade, SchemaType, Value};
//!
//! let facade = Facade::string();
//! let schema = SchemaType::sequence(SchemaType::Integer);
//! let text = facade.convert_from(&schema, &Value::List(vec![1.into(), 2.into()]))?;
//! assert_eq!(text, Value::string("1,2"));
//!
//! let facade = Facade::builder()
//!     .delimiter(';')
//!     .path_converter("0.*", json_types::TupleListConverter)
//!     .build()?;
//! ```

pub mod config;
pub mod facade;
pub mod presets;
pub mod registry;

pub use config::{ConverterKind, FacadeConfig};
pub use facade::{Facade, FacadeBuilder};
pub use presets::Preset;
pub use registry::{Registry, RegistryError, RegistryKey};

pub use convert_core::{
    Context, ConvertError, Converter, ConverterOptions, DateTimeValue, Delegate, Field,
    FileValue, PathSegment, Result, SchemaType, StructuralPath, TimeValue, TypeTag, UtcOffset,
    Value,
};
pub use json_types;
pub use string_types;
