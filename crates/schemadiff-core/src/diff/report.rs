//! Diff report and scoped finding keys

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::Result;
use crate::model::PropertyDescriptor;
use crate::rules::{AttributeChange, Compatibility};

/// Position of a property set within one comparison
///
/// `prefix` qualifies classification keys and always ends in `.`;
/// `path` is the dot-joined location relative to the compared element and is
/// empty at the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    prefix: String,
    path: String,
}

impl Scope {
    /// Top-level scope; a missing trailing `.` is added
    pub fn root(scope: &str) -> Self {
        let mut prefix = scope.to_string();
        if !prefix.ends_with('.') {
            prefix.push('.');
        }
        Self {
            prefix,
            path: String::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classification key for a property: `prefix + name + "."`
    pub fn key(&self, name: &str) -> String {
        format!("{}{}.", self.prefix, name)
    }

    /// Structural path for a property
    pub fn path(&self, name: &str) -> String {
        format!("{}{}", self.path, name)
    }

    /// Scope for the properties nested under `name`
    pub fn child(&self, name: &str) -> Scope {
        Scope {
            prefix: self.key(name),
            path: format!("{}{}.", self.path, name),
        }
    }
}

/// Structured result of comparing two elements
///
/// Built once per comparison and read through accessors. For any path,
/// `added`, `removed` and `changed` are disjoint; the classification maps
/// annotate `changed` entries only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    added: BTreeMap<String, PropertyDescriptor>,
    removed: BTreeMap<String, PropertyDescriptor>,
    changed: BTreeMap<String, BTreeSet<AttributeChange>>,
    breaking: BTreeMap<String, BTreeSet<String>>,
    potentially_breaking: BTreeMap<String, BTreeSet<String>>,
}

impl DiffReport {
    /// Properties present only in the future element
    pub fn added(&self) -> &BTreeMap<String, PropertyDescriptor> {
        &self.added
    }

    /// Properties present only in the existing element
    pub fn removed(&self) -> &BTreeMap<String, PropertyDescriptor> {
        &self.removed
    }

    /// Properties present on both sides with at least one differing attribute
    pub fn changed(&self) -> &BTreeMap<String, BTreeSet<AttributeChange>> {
        &self.changed
    }

    pub fn breaking(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.breaking
    }

    pub fn potentially_breaking(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.potentially_breaking
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.breaking.is_empty()
            && self.potentially_breaking.is_empty()
    }

    /// Most severe classification in the report
    ///
    /// Added and removed properties do not contribute.
    pub fn compatibility(&self) -> Compatibility {
        if !self.breaking.is_empty() {
            Compatibility::Breaking
        } else if !self.potentially_breaking.is_empty() {
            Compatibility::PotentiallyBreaking
        } else {
            Compatibility::NonBreaking
        }
    }

    /// SHA-256 over the canonical JSON form of the report
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the report cannot be encoded.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    pub(crate) fn record_added(&mut self, scope: &Scope, name: &str, property: PropertyDescriptor) {
        self.added.insert(scope.path(name), property);
    }

    pub(crate) fn record_removed(&mut self, scope: &Scope, name: &str, property: PropertyDescriptor) {
        self.removed.insert(scope.path(name), property);
    }

    /// Record the attribute deltas of one property
    ///
    /// No entry is made when `changes` is empty.
    pub(crate) fn record_changed(&mut self, scope: &Scope, name: &str, changes: Vec<AttributeChange>) {
        if changes.is_empty() {
            return;
        }
        let key = scope.key(name);
        for change in &changes {
            let target = match change.compatibility {
                Compatibility::Breaking => &mut self.breaking,
                Compatibility::PotentiallyBreaking => &mut self.potentially_breaking,
                Compatibility::NonBreaking => continue,
            };
            target
                .entry(key.clone())
                .or_default()
                .insert(change.message(&key));
        }
        self.changed
            .entry(scope.path(name))
            .or_default()
            .extend(changes);
    }

    /// Fold a nested report into this one (key union, set union on collision)
    pub(crate) fn merge(&mut self, other: DiffReport) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
        merge_sets(&mut self.changed, other.changed);
        merge_sets(&mut self.breaking, other.breaking);
        merge_sets(&mut self.potentially_breaking, other.potentially_breaking);
    }
}

fn merge_sets<T: Ord>(into: &mut BTreeMap<String, BTreeSet<T>>, from: BTreeMap<String, BTreeSet<T>>) {
    for (key, values) in from {
        into.entry(key).or_default().extend(values);
    }
}
