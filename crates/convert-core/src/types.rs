//! Schema types for schema-convert.
//!
//! This module defines `SchemaType`, the read-only description of a value's
//! shape supplied by the schema system, and `TypeTag`, the closed set of keys
//! the converter registry is indexed by.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Registry key for a schema kind.
///
/// Concrete kinds map one-to-one onto `SchemaType` variants. `Number` and
/// `Container` are abstract parents that only appear in specificity chains,
/// so a registry entry for `Number` serves every numeric kind that has no
/// entry of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Integer,
    Float,
    Decimal,
    String,
    Boolean,
    Date,
    Time,
    DateTime,
    File,
    Sequence,
    Tuple,
    Structure,

    /// Abstract parent of Integer, Float and Decimal
    Number,
    /// Abstract parent of Sequence, Tuple and Structure
    Container,
}

impl TypeTag {
    /// Every tag, concrete kinds first.
    pub const ALL: [TypeTag; 14] = [
        Self::Integer,
        Self::Float,
        Self::Decimal,
        Self::String,
        Self::Boolean,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::File,
        Self::Sequence,
        Self::Tuple,
        Self::Structure,
        Self::Number,
        Self::Container,
    ];

    /// Lowercase name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date_time",
            Self::File => "file",
            Self::Sequence => "sequence",
            Self::Tuple => "tuple",
            Self::Structure => "structure",
            Self::Number => "number",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| format!("Unknown type tag: {s}"))
    }
}

/// A named field of a `Structure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, used as the path segment when recursing
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: SchemaType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, field_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Schema type descriptor.
///
/// Immutable for the lifetime of any conversion. Composite kinds give access
/// to their element or field types.
///
/// # YAML Format
///
/// Simple kinds are plain strings:
/// ```yaml
/// type: integer
/// type: date_time
/// ```
///
/// Composite kinds use the object format:
/// ```yaml
/// type:
///   type: sequence
///   element: integer
/// type:
///   type: tuple
///   elements: [integer, string]
/// type:
///   type: structure
///   fields:
///     - name: x
///       type: integer
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    Integer,
    Float,
    /// Arbitrary-precision decimal
    Decimal,
    String,
    Boolean,
    Date,
    /// Time of day with optional UTC offset
    Time,
    /// Date and time of day with optional UTC offset
    DateTime,
    /// Binary or text file
    File,

    /// Homogeneous sequence
    Sequence {
        /// Element type
        element: Box<SchemaType>,
    },

    /// Fixed-arity tuple
    Tuple {
        /// Positional element types
        elements: Vec<SchemaType>,
    },

    /// Named fields, in declaration order
    Structure {
        /// Field definitions
        fields: Vec<Field>,
    },
}

impl SchemaType {
    /// Create a sequence type with the given element type.
    pub fn sequence(element: SchemaType) -> Self {
        Self::Sequence {
            element: Box::new(element),
        }
    }

    /// Create a tuple type with the given element types.
    pub fn tuple(elements: Vec<SchemaType>) -> Self {
        Self::Tuple { elements }
    }

    /// Create a structure type from `(name, type)` pairs.
    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, SchemaType)>,
        S: Into<String>,
    {
        Self::Structure {
            fields: fields
                .into_iter()
                .map(|(name, ty)| Field::new(name, ty))
                .collect(),
        }
    }

    /// The registry tag of this exact kind.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Integer => TypeTag::Integer,
            Self::Float => TypeTag::Float,
            Self::Decimal => TypeTag::Decimal,
            Self::String => TypeTag::String,
            Self::Boolean => TypeTag::Boolean,
            Self::Date => TypeTag::Date,
            Self::Time => TypeTag::Time,
            Self::DateTime => TypeTag::DateTime,
            Self::File => TypeTag::File,
            Self::Sequence { .. } => TypeTag::Sequence,
            Self::Tuple { .. } => TypeTag::Tuple,
            Self::Structure { .. } => TypeTag::Structure,
        }
    }

    /// Registry tags to try, most specific first.
    ///
    /// The universal root is never part of the chain.
    pub fn specificity_chain(&self) -> &'static [TypeTag] {
        match self {
            Self::Integer => &[TypeTag::Integer, TypeTag::Number],
            Self::Float => &[TypeTag::Float, TypeTag::Number],
            Self::Decimal => &[TypeTag::Decimal, TypeTag::Number],
            Self::String => &[TypeTag::String],
            Self::Boolean => &[TypeTag::Boolean],
            Self::Date => &[TypeTag::Date],
            Self::Time => &[TypeTag::Time],
            Self::DateTime => &[TypeTag::DateTime],
            Self::File => &[TypeTag::File],
            Self::Sequence { .. } => &[TypeTag::Sequence, TypeTag::Container],
            Self::Tuple { .. } => &[TypeTag::Tuple, TypeTag::Container],
            Self::Structure { .. } => &[TypeTag::Structure, TypeTag::Container],
        }
    }

    /// Check if this type is a sequence or tuple, i.e. renders as a CSV row.
    pub fn is_row_like(&self) -> bool {
        matches!(self, Self::Sequence { .. } | Self::Tuple { .. })
    }

    /// Check if this type is an atomic kind.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Self::Sequence { .. } | Self::Tuple { .. } | Self::Structure { .. }
        )
    }

    /// Element type of a sequence.
    pub fn element(&self) -> Option<&SchemaType> {
        match self {
            Self::Sequence { element } => Some(element),
            _ => None,
        }
    }

    /// Element types of a tuple.
    pub fn elements(&self) -> Option<&[SchemaType]> {
        match self {
            Self::Tuple { elements } => Some(elements),
            _ => None,
        }
    }

    /// Fields of a structure.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Structure { fields } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence { element } => write!(f, "sequence<{element}>"),
            Self::Tuple { elements } => {
                f.write_str("tuple<")?;
                for (n, e) in elements.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{e}")?;
                }
                f.write_str(">")
            }
            Self::Structure { fields } => {
                f.write_str("structure{")?;
                for (n, field) in fields.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.field_type)?;
                }
                f.write_str("}")
            }
            scalar => f.write_str(scalar.tag().name()),
        }
    }
}

// Custom serialization/deserialization for SchemaType
// Supports both simple string format ("integer") and object format ({"type": "sequence", "element": ...})

impl Serialize for SchemaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Sequence { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "sequence")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Tuple { elements } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "tuple")?;
                map.serialize_entry("elements", elements)?;
                map.end()
            }
            Self::Structure { fields } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "structure")?;
                map.serialize_entry("fields", fields)?;
                map.end()
            }
            scalar => serializer.serialize_str(scalar.tag().name()),
        }
    }
}

fn scalar_from_name(name: &str) -> Option<SchemaType> {
    match name {
        "integer" | "int" => Some(SchemaType::Integer),
        "float" => Some(SchemaType::Float),
        "decimal" => Some(SchemaType::Decimal),
        "string" | "text" => Some(SchemaType::String),
        "boolean" | "bool" => Some(SchemaType::Boolean),
        "date" => Some(SchemaType::Date),
        "time" => Some(SchemaType::Time),
        "date_time" | "datetime" => Some(SchemaType::DateTime),
        "file" => Some(SchemaType::File),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for SchemaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct SchemaTypeVisitor;

        impl<'de> Visitor<'de> for SchemaTypeVisitor {
            type Value = SchemaType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a SchemaType")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                scalar_from_name(value)
                    .ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                if let Some(scalar) = scalar_from_name(&type_name) {
                    return Ok(scalar);
                }

                match type_name.as_str() {
                    "sequence" | "list" => {
                        let element: SchemaType = get_field_required(&fields, "element")?;
                        Ok(SchemaType::sequence(element))
                    }
                    "tuple" => {
                        let elements = get_field_required(&fields, "elements")?;
                        Ok(SchemaType::Tuple { elements })
                    }
                    "structure" => {
                        let fields = get_field_required(&fields, "fields")?;
                        Ok(SchemaType::Structure { fields })
                    }
                    _ => Err(M::Error::custom(format!("unknown type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(SchemaTypeVisitor)
    }
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_json() {
        let json = r#"{"type": "tuple", "elements": ["date", {"type": "sequence", "element": "int"}]}"#;
        let parsed: SchemaType = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            SchemaType::tuple(vec![
                SchemaType::Date,
                SchemaType::sequence(SchemaType::Integer)
            ])
        );
    }

    #[test]
    fn test_type_tag_names_parse_back() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.name().parse::<TypeTag>(), Ok(tag));
        }
        assert!("datetime".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_specificity_chain() {
        assert_eq!(
            SchemaType::Integer.specificity_chain(),
            &[TypeTag::Integer, TypeTag::Number]
        );
        assert_eq!(SchemaType::Date.specificity_chain(), &[TypeTag::Date]);
        assert_eq!(
            SchemaType::tuple(vec![SchemaType::String]).specificity_chain(),
            &[TypeTag::Tuple, TypeTag::Container]
        );
        for ty in [SchemaType::Float, SchemaType::Decimal, SchemaType::File] {
            assert_eq!(ty.specificity_chain()[0], ty.tag());
        }
    }

    #[test]
    fn test_type_categories() {
        assert!(SchemaType::sequence(SchemaType::Integer).is_row_like());
        assert!(SchemaType::tuple(vec![]).is_row_like());
        assert!(!SchemaType::structure(Vec::<(String, SchemaType)>::new()).is_row_like());

        assert!(SchemaType::Boolean.is_scalar());
        assert!(!SchemaType::sequence(SchemaType::Integer).is_scalar());
    }

    #[test]
    fn test_deserialize_simple_string() {
        let parsed: SchemaType = serde_yaml::from_str("integer").unwrap();
        assert_eq!(parsed, SchemaType::Integer);

        let parsed: SchemaType = serde_yaml::from_str("datetime").unwrap();
        assert_eq!(parsed, SchemaType::DateTime);

        assert!(serde_yaml::from_str::<SchemaType>("complex").is_err());
    }

    #[test]
    fn test_deserialize_composite_types() {
        let yaml = r#"
type: sequence
element:
  type: tuple
  elements: [integer, string]
"#;
        let parsed: SchemaType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            SchemaType::sequence(SchemaType::tuple(vec![
                SchemaType::Integer,
                SchemaType::String
            ]))
        );

        let yaml = r#"
type: structure
fields:
  - name: x
    type: integer
  - name: y
    type:
      type: sequence
      element: integer
"#;
        let parsed: SchemaType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            SchemaType::structure([
                ("x", SchemaType::Integer),
                ("y", SchemaType::sequence(SchemaType::Integer)),
            ])
        );
    }

    #[test]
    fn test_deserialize_missing_element() {
        let yaml = "type: sequence\n";
        let err = serde_yaml::from_str::<SchemaType>(yaml).unwrap_err();
        assert!(err.to_string().contains("element"));
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let types = vec![
            SchemaType::Boolean,
            SchemaType::DateTime,
            SchemaType::sequence(SchemaType::sequence(SchemaType::Integer)),
            SchemaType::tuple(vec![SchemaType::Date, SchemaType::Time]),
            SchemaType::structure([("a", SchemaType::Decimal)]),
        ];

        for ty in types {
            let yaml = serde_yaml::to_string(&ty).unwrap();
            let parsed: SchemaType = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(ty, parsed);
        }
    }

    #[test]
    fn test_display() {
        let ty = SchemaType::sequence(SchemaType::tuple(vec![
            SchemaType::Integer,
            SchemaType::String,
        ]));
        assert_eq!(ty.to_string(), "sequence<tuple<integer, string>>");
    }
}
