//! Built-in registries for text and JSON-like targets.

use crate::registry::Registry;
use convert_core::TypeTag;
use json_types::{
    DateToTaggedMapConverter, SequenceListConverter, StructureMapConverter,
    TimeToTaggedMapConverter, TupleListConverter,
};
use serde::{Deserialize, Serialize};
use string_types::{
    BooleanToStringConverter, DateTimeToStringConverter, DateToStringConverter,
    DecimalToStringConverter, FileToStringConverter, FloatToStringConverter, IdentityConverter,
    IntegerToStringConverter, SequenceToStringConverter, TimeToStringConverter,
    TupleToStringConverter,
};

/// Named set of default converters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Everything as text; sequences and tuples as CSV
    #[default]
    String,
    /// Native scalars, lists and maps; dates and times as tagged maps
    Json,
}

impl Preset {
    /// Build the registry this preset names.
    pub fn registry(self) -> Registry {
        match self {
            Self::String => Registry::string_defaults(),
            Self::Json => Registry::json_defaults(),
        }
    }
}

impl Registry {
    /// Text converters for every concrete kind except Structure.
    pub fn string_defaults() -> Self {
        Registry::new()
            .with_type(TypeTag::Integer, IntegerToStringConverter)
            .with_type(TypeTag::Float, FloatToStringConverter)
            .with_type(TypeTag::Decimal, DecimalToStringConverter)
            .with_type(TypeTag::String, IdentityConverter)
            .with_type(TypeTag::Boolean, BooleanToStringConverter)
            .with_type(TypeTag::Date, DateToStringConverter)
            .with_type(TypeTag::Time, TimeToStringConverter)
            .with_type(TypeTag::DateTime, DateTimeToStringConverter)
            .with_type(TypeTag::File, FileToStringConverter)
            .with_type(TypeTag::Sequence, SequenceToStringConverter)
            .with_type(TypeTag::Tuple, TupleToStringConverter)
    }

    /// Converters for targets with native numbers, booleans, lists and maps.
    ///
    /// Decimals, datetimes and files still become text.
    pub fn json_defaults() -> Self {
        Registry::new()
            .with_type(TypeTag::Integer, IdentityConverter)
            .with_type(TypeTag::Float, IdentityConverter)
            .with_type(TypeTag::Decimal, DecimalToStringConverter)
            .with_type(TypeTag::String, IdentityConverter)
            .with_type(TypeTag::Boolean, IdentityConverter)
            .with_type(TypeTag::Date, DateToTaggedMapConverter)
            .with_type(TypeTag::Time, TimeToTaggedMapConverter)
            .with_type(TypeTag::DateTime, DateTimeToStringConverter)
            .with_type(TypeTag::File, FileToStringConverter)
            .with_type(TypeTag::Sequence, SequenceListConverter)
            .with_type(TypeTag::Tuple, TupleListConverter)
            .with_type(TypeTag::Structure, StructureMapConverter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryKey;

    #[test]
    fn test_string_defaults_skip_structure() {
        let registry = Registry::string_defaults();
        for tag in &TypeTag::ALL[..11] {
            assert!(
                registry.contains(&RegistryKey::Type(*tag)),
                "Missing converter for {tag}"
            );
        }
        assert!(!registry.contains(&RegistryKey::Type(TypeTag::Structure)));
        assert_eq!(registry.patterns().count(), 0);
    }

    #[test]
    fn test_json_defaults_cover_every_kind() {
        let registry = Registry::json_defaults();
        for tag in &TypeTag::ALL[..12] {
            assert!(
                registry.contains(&RegistryKey::Type(*tag)),
                "Missing converter for {tag}"
            );
        }
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(serde_yaml::from_str::<Preset>("json").unwrap(), Preset::Json);
        assert_eq!(Preset::default(), Preset::String);
    }
}
