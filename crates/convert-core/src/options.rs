//! Converter options.

use serde::{Deserialize, Serialize};

/// Default CSV delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Error type for invalid converter options.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    NonAsciiDelimiter(char),

    #[error("Delimiter cannot be the quote character")]
    QuoteDelimiter,
}

/// Fixed configuration threaded through every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterOptions {
    /// CSV delimiter character (default: ',')
    pub delimiter: char,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ConverterOptions {
    /// Options with the given delimiter, validated.
    pub fn with_delimiter(delimiter: char) -> Result<Self, OptionsError> {
        let options = Self { delimiter };
        options.validate()?;
        Ok(options)
    }

    /// Check that the options can be used by the CSV row codec.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.delimiter.is_ascii() {
            return Err(OptionsError::NonAsciiDelimiter(self.delimiter));
        }
        if self.delimiter == '"' {
            return Err(OptionsError::QuoteDelimiter);
        }
        Ok(())
    }

    /// Delimiter as the single byte the CSV codec works with.
    ///
    /// Only meaningful for validated options.
    pub fn delimiter_byte(&self) -> u8 {
        let mut buf = [0u8; 4];
        self.delimiter.encode_utf8(&mut buf).as_bytes()[0]
    }
}
