//! Error types for convert-core and the converters built on it.

use crate::path::StructuralPath;
use crate::types::TypeTag;
use thiserror::Error;

/// Errors that can occur during a conversion.
///
/// Errors are raised where the failure happens and travel unmodified through
/// every recursive call frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// External representation cannot be parsed into the target type
    #[error("{0}")]
    InvalidValue(String),

    /// Tuple cell count differs from the declared arity
    #[error("{0}")]
    ArityMismatch(String),

    /// Structurally invalid CSV framing
    #[error("{0}")]
    MalformedInput(String),

    /// File conversion attempted without a readable source
    #[error("Cannot convert to string without a file-like object to read from")]
    MissingSource,

    /// No registry entry matched the schema type or path
    #[error("No converter found for type '{tag}' at path {path}")]
    NoConverterFound { tag: TypeTag, path: StructuralPath },

    /// Converter registered for a schema kind it cannot handle
    #[error("Converter {converter} cannot handle schema type '{found}'")]
    SchemaMismatch {
        converter: &'static str,
        found: TypeTag,
    },

    /// Value shape does not match the schema kind
    #[error("Expected {expected} value, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },
}

impl ConvertError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self::ArityMismatch(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Check if this error stems from bad external data rather than caller
    /// misuse or a configuration gap.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidValue(_) | Self::ArityMismatch(_) | Self::MalformedInput(_)
        )
    }
}

/// Result type alias for conversions.
pub type Result<T> = std::result::Result<T, ConvertError>;
