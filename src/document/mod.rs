//! In-memory configuration documents.
//!
//! This module is split into logical submodules:
//! - [`value`]: scalar values and entries (`Value`, `Entry`)
//! - [`parser`]: text to document (`parse`, `load`)
//! - [`writer`]: document to text (`write`, `save`)
//!
//! A [`ConfigDocument`] keeps sections and keys in order of first appearance,
//! which is the order the writer emits them in.

mod parser;
mod value;
mod writer;

pub use parser::{load, parse};
pub use value::{Entry, Value};
pub use writer::{GUARD_LINE, save, write, write_to};

pub(crate) use value::{is_float_literal, is_int_literal};

use indexmap::IndexMap;
use serde::Serialize;

/// A named group of settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Section {
    entries: IndexMap<String, Entry>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    /// Bind `key` to `entry`, replacing any previous binding in place.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(key.into(), entry)
    }

    /// Remove `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fully parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: IndexMap<String, Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Get the named section, creating an empty one at the end if missing.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_owned()).or_default()
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Look up the raw entry for `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&Entry> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Layer `overlay` on top of this document, returning the result.
    ///
    /// Entries from `overlay` replace entries for the same key wholesale: a
    /// list in the overlay replaces the base list rather than extending it.
    /// Sections and keys the base lacks are appended in overlay order.
    #[must_use]
    pub fn merged_with(&self, overlay: &ConfigDocument) -> ConfigDocument {
        let mut merged = self.clone();
        for (name, section) in overlay.sections() {
            let target = merged.section_or_insert(name);
            for (key, entry) in section.iter() {
                target.insert(key, entry.clone());
            }
        }
        merged
    }
}

/// Layer `overlay` on top of `base`. See [`ConfigDocument::merged_with`].
pub fn merge(base: &ConfigDocument, overlay: &ConfigDocument) -> ConfigDocument {
    base.merged_with(overlay)
}
