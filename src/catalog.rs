//! Language catalog lookup
//!
//! A read-only view over an externally supplied list of language records
//! (e.g. the ISO 639-3 dataset). Loaded once, immutable thereafter, and
//! safely shareable across workflow instances.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One language in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Language code (becomes the `language` field's value when selected)
    pub code: String,
    /// Human-readable display name
    pub name: String,
}

/// An immutable, searchable catalog of `(code, name)` language pairs.
///
/// Entries are sorted by display name ascending and deduplicated by code
/// (the first record for a code wins).
#[derive(Clone, Debug)]
pub struct LanguageCatalog {
    entries: Vec<LanguageEntry>,
}

impl LanguageCatalog {
    /// Build a catalog from raw records.
    ///
    /// Sorting compares Unicode-lowercased display names, which matches
    /// locale-aware ordering for the Latin-script names the upstream dataset
    /// uses.
    pub fn new(records: impl IntoIterator<Item = LanguageEntry>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries: Vec<LanguageEntry> = records
            .into_iter()
            .filter(|record| seen.insert(record.code.clone()))
            .collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.code.cmp(&b.code))
        });
        Self { entries }
    }

    /// Build a catalog from a JSON array of `{"code": ..., "name": ...}` records.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let records: Vec<LanguageEntry> = serde_json::from_slice(bytes)?;
        Ok(Self::new(records))
    }

    /// The full ordered entry list.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Look up the display name for a language code.
    pub fn find_by_code(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.name.as_str())
    }

    /// Case-insensitive substring search over display names, for
    /// type-to-filter selection.
    pub fn search(&self, query: &str) -> Vec<&LanguageEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
