//! Declarative facade configuration.
//!
//! ```yaml
//! preset: string          # string | json
//! options:
//!   delimiter: ";"
//! types:
//!   date: date_tagged
//! paths:
//!   "0.*": tuple_list
//! ```
//!
//! Structures have no text default; `structure: yaml` or `structure: ini`
//! under `types` picks a document format.
//!
//! The same layout is accepted as TOML.

use crate::facade::{Facade, FacadeBuilder};
use crate::presets::Preset;
use crate::registry::{RegistryError, RegistryKey};
use anyhow::Context;
use convert_core::{Converter, ConverterOptions, TypeTag};
use json_types::{
    DateToTaggedMapConverter, DateTripleConverter, SequenceListConverter, StructureMapConverter,
    TimeToTaggedMapConverter, TupleListConverter,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use string_types::{
    BooleanToStringConverter, DateTimeToStringConverter, DateToStringConverter,
    DecimalToStringConverter, FileToStringConverter, FloatToStringConverter, IdentityConverter,
    IniConverter, IniSectionConverter, IntegerToStringConverter, SequenceToStringConverter,
    TimeToStringConverter, TupleToStringConverter, YamlConverter,
};

/// Built-in converters, by configuration name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConverterKind {
    Identity,
    IntegerString,
    FloatString,
    DecimalString,
    BooleanString,
    DateString,
    TimeString,
    DateTimeString,
    FileString,
    SequenceString,
    TupleString,
    Yaml,
    Ini,
    IniSection,
    DateTagged,
    TimeTagged,
    DateTriple,
    SequenceList,
    TupleList,
    StructureMap,
}

impl ConverterKind {
    /// A shared instance of the converter.
    pub fn converter(self) -> Arc<dyn Converter> {
        match self {
            Self::Identity => Arc::new(IdentityConverter),
            Self::IntegerString => Arc::new(IntegerToStringConverter),
            Self::FloatString => Arc::new(FloatToStringConverter),
            Self::DecimalString => Arc::new(DecimalToStringConverter),
            Self::BooleanString => Arc::new(BooleanToStringConverter),
            Self::DateString => Arc::new(DateToStringConverter),
            Self::TimeString => Arc::new(TimeToStringConverter),
            Self::DateTimeString => Arc::new(DateTimeToStringConverter),
            Self::FileString => Arc::new(FileToStringConverter),
            Self::SequenceString => Arc::new(SequenceToStringConverter),
            Self::TupleString => Arc::new(TupleToStringConverter),
            Self::Yaml => Arc::new(YamlConverter),
            Self::Ini => Arc::new(IniConverter),
            Self::IniSection => Arc::new(IniSectionConverter),
            Self::DateTagged => Arc::new(DateToTaggedMapConverter),
            Self::TimeTagged => Arc::new(TimeToTaggedMapConverter),
            Self::DateTriple => Arc::new(DateTripleConverter),
            Self::SequenceList => Arc::new(SequenceListConverter),
            Self::TupleList => Arc::new(TupleListConverter),
            Self::StructureMap => Arc::new(StructureMapConverter),
        }
    }
}

/// Preset, options and overrides for building a [`Facade`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacadeConfig {
    #[serde(default)]
    pub preset: Preset,

    #[serde(default)]
    pub options: ConverterOptions,

    /// Type tag name → converter
    #[serde(default)]
    pub types: BTreeMap<String, ConverterKind>,

    /// Path pattern → converter
    #[serde(default)]
    pub paths: BTreeMap<String, ConverterKind>,
}

impl FacadeConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: FacadeConfig =
            serde_yaml::from_str(yaml).context("Failed to parse converter config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: FacadeConfig =
            toml::from_str(text).context("Failed to parse converter config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.options
            .validate()
            .context("Invalid converter options")?;
        for name in self.types.keys() {
            name.parse::<TypeTag>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid type override '{name}'"))?;
        }
        Ok(())
    }

    /// Every override as a registry key, types first.
    pub fn overrides(&self) -> Result<Vec<(RegistryKey, ConverterKind)>, RegistryError> {
        let mut overrides = Vec::with_capacity(self.types.len() + self.paths.len());
        for (name, kind) in &self.types {
            let tag = name.parse::<TypeTag>().map_err(RegistryError::UnknownTypeTag)?;
            overrides.push((RegistryKey::Type(tag), *kind));
        }
        for (pattern, kind) in &self.paths {
            overrides.push((RegistryKey::Path(pattern.clone()), *kind));
        }
        Ok(overrides)
    }

    /// Builder seeded with this configuration.
    pub fn builder(&self) -> Result<FacadeBuilder, RegistryError> {
        let builder = Facade::builder()
            .preset(self.preset)
            .options(self.options);
        Ok(self
            .overrides()?
            .into_iter()
            .fold(builder, |builder, (key, kind)| {
                builder.override_with(key, kind.converter())
            }))
    }

    /// Build the facade this configuration describes.
    pub fn build(&self) -> Result<Facade, RegistryError> {
        self.builder()?.build()
    }
}
