//! Parsing options for delimited text input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Cell strings read as missing values when `na_values` is left at its default.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text encoding of the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
    /// Latin-1 bytes with backslash escape sequences resolved.
    #[default]
    #[serde(rename = "unicode-escape", alias = "unicode_escape")]
    UnicodeEscape,
}

impl TextEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::UnicodeEscape => "unicode-escape",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextEncoding {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            "unicode-escape" => Ok(Self::UnicodeEscape),
            _ => Err(IngestError::UnknownEncoding(value.to_string())),
        }
    }
}

/// Options controlling how a delimited file is decoded and split.
///
/// Defaults: `;` separator, `"` quote, spaces after a separator skipped,
/// unicode-escape decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvOptions {
    pub delimiter: char,
    pub quote: char,
    /// Skip spaces immediately following a delimiter.
    pub skip_initial_space: bool,
    pub encoding: TextEncoding,
    /// Cell strings treated as missing.
    pub na_values: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ';',
            quote: '"',
            skip_initial_space: true,
            encoding: TextEncoding::default(),
            na_values: DEFAULT_NA_VALUES.iter().map(|value| (*value).to_string()).collect(),
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_skip_initial_space(mut self, enable: bool) -> Self {
        self.skip_initial_space = enable;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_na_values(mut self, values: Vec<String>) -> Self {
        self.na_values = values;
        self
    }

    pub(crate) fn delimiter_byte(&self) -> Result<u8> {
        ascii_byte("delimiter", self.delimiter)
    }

    pub(crate) fn quote_byte(&self) -> Result<u8> {
        ascii_byte("quote", self.quote)
    }

    pub(crate) fn is_na(&self, value: &str) -> bool {
        self.na_values.iter().any(|na| na == value)
    }
}

fn ascii_byte(option: &'static str, value: char) -> Result<u8> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(IngestError::InvalidOption { option, value })
    }
}
