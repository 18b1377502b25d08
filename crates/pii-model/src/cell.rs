//! Cell and field values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Serializes to the matching JSON scalar. Non-finite floats serialize as
/// `null`, so `Float(NaN)` reads back as [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl CellValue {
    /// Returns the text when this cell is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Truthiness of a scalar: `Null`, `""`, `0`, `0.0`, `-0.0` and `false`
    /// are falsy. `NaN` is truthy.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(value) => value.is_empty(),
            Self::Integer(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::Boolean(value) => !value,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// The value stored under one key of a [`crate::ColumnMapping`].
///
/// Tabular input always produces [`FieldValue::List`]; scalars appear when a
/// mapping is built by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    List(Vec<CellValue>),
    Scalar(CellValue),
}

impl FieldValue {
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CellValue>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub fn scalar(value: impl Into<CellValue>) -> Self {
        Self::Scalar(value.into())
    }

    /// Truthiness used to skip analysis of vacuous values.
    ///
    /// An empty list is falsy, as is any falsy scalar (see
    /// [`CellValue::is_falsy`]). This deliberately treats a legitimate `0` or
    /// `false` the same as a missing value.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::List(values) => values.is_empty(),
            Self::Scalar(value) => value.is_falsy(),
        }
    }

    /// Number of leaf cells (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Self::List(values) => values.len(),
            Self::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the leaf cells.
    pub fn cells(&self) -> std::slice::Iter<'_, CellValue> {
        match self {
            Self::List(values) => values.iter(),
            Self::Scalar(value) => std::slice::from_ref(value).iter(),
        }
    }
}

impl From<CellValue> for FieldValue {
    fn from(value: CellValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<CellValue>> for FieldValue {
    fn from(values: Vec<CellValue>) -> Self {
        Self::List(values)
    }
}
