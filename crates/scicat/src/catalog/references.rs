//! Reference dictionary: short reference keys mapped to full citations.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScicatError};

/// Separator between key and definition on each dictionary line.
const SEPARATOR: &str = " : ";

/// Mapping of reference key to definition.
///
/// Entries keep insertion order on disk; equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDictionary {
    entries: IndexMap<String, String>,
}

impl ReferenceDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Check whether a key is defined.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a definition, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        definition: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(key.into(), definition.into())
    }

    /// Remove a key, returning its definition.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Number of defined keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no keys are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, definition)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `key : definition` lines. Blank lines are skipped.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut entries = IndexMap::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (key, definition) = line.split_once(SEPARATOR).ok_or_else(|| ScicatError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                message: format!("expected 'key{}definition'", SEPARATOR),
            })?;
            entries.insert(key.to_string(), definition.to_string());
        }
        Ok(Self { entries })
    }

    /// Load a dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ScicatError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Render as `key : definition` lines.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(key, definition)| format!("{}{}{}\n", key, SEPARATOR, definition))
            .collect()
    }

    /// Write the dictionary file, replacing any existing one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render()).map_err(|e| ScicatError::io(path, e))
    }
}

/// Check that a key and definition survive a save and reload unchanged.
///
/// Keys may not contain the separator or end in `" :"`; neither side may span lines.
pub fn check_entry(key: &str, definition: &str) -> Result<()> {
    if key.contains(['\n', '\r']) || definition.contains(['\n', '\r']) {
        return Err(ScicatError::Config(format!(
            "reference '{}' must fit on one line",
            key.escape_debug()
        )));
    }
    if key.contains(SEPARATOR) || key.ends_with(SEPARATOR.trim_end()) {
        return Err(ScicatError::Config(format!(
            "reference key '{}' may not contain '{}'",
            key,
            SEPARATOR.trim()
        )));
    }
    Ok(())
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReferenceDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
