use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::property::PropertyDescriptor;

/// Property name → descriptor, sorted for deterministic traversal
pub type PropertySet = BTreeMap<String, PropertyDescriptor>;

/// The attribute set of one named (or inline) schema element
///
/// `all_of` lists definitions whose properties are composed into this
/// element. Flattening is done by the resolver at comparison time.
/// `required` holds the model-level required names; they also apply to
/// properties that only arrive through composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementShape {
    pub properties: PropertySet,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
}

impl ElementShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, property: PropertyDescriptor) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn with_all_of(mut self, target: impl Into<String>) -> Self {
        self.all_of.push(target.into());
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.insert(name.into());
        self
    }

    /// Mark every listed property in `properties` as required
    pub fn apply_required(&self, properties: &mut PropertySet) {
        for name in &self.required {
            if let Some(property) = properties.get_mut(name) {
                property.list_as_required();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.all_of.is_empty()
    }
}

/// Named element definitions of one schema snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definitions {
    elements: BTreeMap<String, ElementShape>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element, returning the previous shape
    pub fn insert(&mut self, name: impl Into<String>, shape: ElementShape) -> Option<ElementShape> {
        self.elements.insert(name.into(), shape)
    }

    pub fn with_element(mut self, name: impl Into<String>, shape: ElementShape) -> Self {
        self.insert(name, shape);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ElementShape> {
        self.elements.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ElementShape> {
        self.elements.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<(String, ElementShape)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (String, ElementShape)>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}
