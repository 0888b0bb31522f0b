//! Text conversions for convert-core values.
//!
//! This crate provides the converters that render internal values as text
//! and parse them back, including CSV rows for sequences and tuples and
//! YAML or INI documents for structures.
//!
//! # Modules
//!
//! - [`scalar`] - Numbers, booleans, dates, times and files ↔ text
//! - [`csv_row`] - Cells ↔ one quoted, delimited line
//! - [`sequence`] - Sequences ↔ one row, or one row per line when nested
//! - [`tuple`] - Tuples ↔ one row, with empty cells read as null
//! - [`yaml`] - Structures, sequences and tuples ↔ one YAML document
//! - [`ini`] - Structures ↔ INI documents and sections
//!
//! # Example
//!
//! ```ignore
//! use string_types::TupleToStringConverter;
//! use convert_core::{SchemaType, Value};
//!
//! let schema = SchemaType::tuple(vec![SchemaType::String, SchemaType::String]);
//! let text = facade.convert_from(&schema, &Value::Tuple(vec![Value::Null, "foo".into()]))?;
//! assert_eq!(text, Value::string(",foo"));
//! ```

pub mod csv_row;
pub mod identity;
pub mod ini;
pub mod scalar;
pub mod sequence;
pub mod tuple;
pub mod yaml;

pub use csv_row::{decode_row, encode_row, MULTIPLE_LINES};
pub use identity::IdentityConverter;
pub use ini::{IniConverter, IniSectionConverter};
pub use scalar::{
    date_from_parts, format_date, format_datetime, format_float, format_time, parse_date,
    parse_datetime, parse_decimal, parse_time, BooleanToStringConverter, DateTimeToStringConverter,
    DateToStringConverter, DecimalToStringConverter, FileToStringConverter,
    FloatToStringConverter, IntegerToStringConverter, TimeToStringConverter,
};
pub use sequence::SequenceToStringConverter;
pub use tuple::{check_arity, TupleToStringConverter};
pub use yaml::YamlConverter;
