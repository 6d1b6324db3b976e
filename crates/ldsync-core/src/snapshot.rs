//! Directory snapshot model.
//!
//! In-memory representation of one store's entries at a single point
//! in time. Snapshots are built once per run by a search collaborator,
//! read by the reconciliation engine, and discarded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A directory entry: named attributes, each holding one or more
/// string values.
///
/// Value order carries no meaning for comparison but is preserved so
/// that entries re-emit the way the store returned them. Attribute
/// names and values compare by exact string equality; no case folding
/// or normalization is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Map of attribute name to its values.
    #[serde(flatten)]
    attributes: HashMap<String, Vec<String>>,
}

impl Entry {
    /// Create a new empty entry.
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
        }
    }

    /// Set an attribute's values, replacing any previous values.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into(), values);
    }

    /// Set an attribute using the builder pattern.
    pub fn with<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.set(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Get an attribute's values.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Check if an attribute exists.
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate over attribute names in map order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Attribute names in sorted order, for deterministic output.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.attributes.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the entry has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for Entry {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// A fully materialized, read-only copy of one store's entries,
/// keyed by distinguished name.
///
/// Keys are unique and matched exactly, case-sensitively, as the
/// store returned them. Iteration order is not significant; the
/// engine sorts when it needs determinism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Map of DN to entry.
    #[serde(flatten)]
    entries: HashMap<String, Entry>,
}

impl Snapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert an entry under its DN, replacing any previous entry.
    pub fn insert(&mut self, dn: impl Into<String>, entry: Entry) {
        self.entries.insert(dn.into(), entry);
    }

    /// Insert an entry using the builder pattern.
    pub fn with(mut self, dn: impl Into<String>, entry: Entry) -> Self {
        self.insert(dn, entry);
        self
    }

    /// Get the entry for a DN.
    pub fn get(&self, dn: &str) -> Option<&Entry> {
        self.entries.get(dn)
    }

    /// Check if a DN exists.
    pub fn contains(&self, dn: &str) -> bool {
        self.entries.contains_key(dn)
    }

    /// Iterate over DNs in map order.
    pub fn dns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Entry)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Entry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
