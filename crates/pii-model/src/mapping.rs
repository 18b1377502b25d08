//! Ordered column mapping.

use std::collections::BTreeMap;

use crate::cell::FieldValue;
use crate::error::{ModelError, Result};

/// Ordered mapping from column name to value.
///
/// Keys are unique and keep insertion order. Built once before analysis and
/// not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    entries: Vec<(String, FieldValue)>,
    index: BTreeMap<String, usize>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from ordered entries, rejecting duplicate keys.
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        let mut mapping = Self::new();
        for (key, value) in entries {
            mapping.insert(key, value)?;
        }
        Ok(mapping)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(ModelError::DuplicateKey(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl IntoIterator for ColumnMapping {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
