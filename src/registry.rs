//! Converter registry and resolver.
//!
//! Converters are registered against a [`TypeTag`] or a path pattern such as
//! `"0.*"`. Resolution tries path patterns first, then walks the schema
//! type's specificity chain:
//!
//! ```text
//! resolve(schema, path)
//!    │
//!    ├─ path patterns matching path.key(), greatest pattern string wins
//!    │
//!    └─ type tags, most specific first:  [Integer, Number]
//! ```
//!
//! A pattern matches from the start of the key but not necessarily to its
//! end, so `"0.1"` also matches `"0.1.2"`.

use convert_core::{ConvertError, Converter, OptionsError, SchemaType, StructuralPath, TypeTag};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a registry or facade.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Path pattern is empty or has an empty segment
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Type tag name not recognized
    #[error("{0}")]
    UnknownTypeTag(String),

    /// Converter options rejected
    #[error("Invalid converter options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

/// What a registry entry is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Type(TypeTag),
    Path(String),
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(tag) => write!(f, "type '{tag}'"),
            Self::Path(pattern) => write!(f, "path pattern '{pattern}'"),
        }
    }
}

/// Compile a dotted pattern of literal segments and `*` wildcards.
///
/// Each `*` stands for exactly one segment. The regex is anchored at the
/// start only.
fn compile_pattern(pattern: &str) -> Result<Regex, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    if pattern.is_empty() {
        return Err(invalid("pattern is empty"));
    }
    let segments = pattern
        .split('.')
        .map(|segment| match segment {
            "" => Err(invalid("empty segment")),
            "*" => Ok("[^.]+".to_string()),
            literal => Ok(regex::escape(literal)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Regex::new(&format!("^{}", segments.join(r"\."))).map_err(|e| invalid(&e.to_string()))
}

#[derive(Clone)]
struct PathRoute {
    pattern: String,
    regex: Regex,
    converter: Arc<dyn Converter>,
}

/// Mapping from type tags and path patterns to converters.
///
/// Built once, then only read: a registry can be shared across threads and
/// concurrent conversions.
#[derive(Default, Clone)]
pub struct Registry {
    types: HashMap<TypeTag, Arc<dyn Converter>>,
    // sorted by pattern, greatest first
    paths: Vec<PathRoute>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a type tag, replacing any existing entry.
    pub fn register_type(&mut self, tag: TypeTag, converter: Arc<dyn Converter>) -> &mut Self {
        if self.types.insert(tag, converter).is_some() {
            tracing::warn!("Converter for type '{tag}' replaced by override");
        }
        self
    }

    /// Register a converter for a path pattern, replacing any existing entry
    /// with the same pattern string.
    pub fn register_path(
        &mut self,
        pattern: &str,
        converter: Arc<dyn Converter>,
    ) -> Result<&mut Self, RegistryError> {
        let regex = compile_pattern(pattern)?;
        if let Some(pos) = self.paths.iter().position(|r| r.pattern == pattern) {
            tracing::warn!("Converter for path pattern '{pattern}' replaced by override");
            self.paths.remove(pos);
        }
        self.paths.push(PathRoute {
            pattern: pattern.to_string(),
            regex,
            converter,
        });
        self.paths.sort_by(|a, b| b.pattern.cmp(&a.pattern));
        Ok(self)
    }

    /// Register a converter under either kind of key.
    pub fn register(
        &mut self,
        key: RegistryKey,
        converter: Arc<dyn Converter>,
    ) -> Result<&mut Self, RegistryError> {
        match key {
            RegistryKey::Type(tag) => Ok(self.register_type(tag, converter)),
            RegistryKey::Path(pattern) => self.register_path(&pattern, converter),
        }
    }

    /// Builder form of [`register_type`](Self::register_type).
    pub fn with_type(mut self, tag: TypeTag, converter: impl Converter + 'static) -> Self {
        self.register_type(tag, Arc::new(converter));
        self
    }

    /// Builder form of [`register_path`](Self::register_path).
    pub fn with_path(
        mut self,
        pattern: &str,
        converter: impl Converter + 'static,
    ) -> Result<Self, RegistryError> {
        self.register_path(pattern, Arc::new(converter))?;
        Ok(self)
    }

    /// Apply overrides on top of this registry; each replaces a same-keyed entry.
    pub fn extend<I>(&mut self, overrides: I) -> Result<&mut Self, RegistryError>
    where
        I: IntoIterator<Item = (RegistryKey, Arc<dyn Converter>)>,
    {
        for (key, converter) in overrides {
            self.register(key, converter)?;
        }
        Ok(self)
    }

    /// Check if a converter is registered under `key`.
    pub fn contains(&self, key: &RegistryKey) -> bool {
        match key {
            RegistryKey::Type(tag) => self.types.contains_key(tag),
            RegistryKey::Path(pattern) => self.paths.iter().any(|r| &r.pattern == pattern),
        }
    }

    /// Registered path patterns, in precedence order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|r| r.pattern.as_str())
    }

    /// Find the converter for a schema type at a structural path, and the key
    /// it was registered under.
    pub fn resolve_entry(
        &self,
        schema: &SchemaType,
        path: &StructuralPath,
    ) -> Result<(RegistryKey, &dyn Converter), ConvertError> {
        let key = path.key();
        if let Some(route) = self.paths.iter().find(|r| r.regex.is_match(&key)) {
            return Ok((
                RegistryKey::Path(route.pattern.clone()),
                route.converter.as_ref(),
            ));
        }

        self.resolve_type_entry(schema, path)
    }

    /// Like [`resolve_entry`](Self::resolve_entry), skipping path patterns.
    ///
    /// `path` only feeds the error when no type entry matches.
    pub fn resolve_type_entry(
        &self,
        schema: &SchemaType,
        path: &StructuralPath,
    ) -> Result<(RegistryKey, &dyn Converter), ConvertError> {
        schema
            .specificity_chain()
            .iter()
            .find_map(|tag| {
                self.types
                    .get(tag)
                    .map(|c| (RegistryKey::Type(*tag), c.as_ref()))
            })
            .ok_or_else(|| ConvertError::NoConverterFound {
                tag: schema.tag(),
                path: path.clone(),
            })
    }

    /// Find the converter for a schema type at a structural path.
    pub fn resolve(
        &self,
        schema: &SchemaType,
        path: &StructuralPath,
    ) -> Result<&dyn Converter, ConvertError> {
        let (key, converter) = self.resolve_entry(schema, path)?;
        tracing::debug!("Resolved {schema} at {path} via {key}");
        Ok(converter)
    }

    /// Find the converter registered for a schema type, ignoring paths.
    pub fn resolve_type(
        &self,
        schema: &SchemaType,
        path: &StructuralPath,
    ) -> Result<&dyn Converter, ConvertError> {
        let (key, converter) = self.resolve_type_entry(schema, path)?;
        tracing::debug!("Resolved {schema} at {path} by type via {key}");
        Ok(converter)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.types.keys().collect();
        types.sort();
        f.debug_struct("Registry")
            .field("types", &types)
            .field("paths", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}
