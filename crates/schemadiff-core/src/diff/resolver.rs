//! Reference lookup, composition flattening and recursion guarding

use std::collections::BTreeSet;

use crate::model::{Definitions, ElementShape, PropertySet};

/// Element pairs on the current recursion path
///
/// A pair is `(existing_target, future_target)`. Entering a pair that is
/// already on the path means the graph cycles back on itself and the branch
/// must stop.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    path: BTreeSet<(String, String)>,
}

impl RecursionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pair; returns `false` if it is already on the path
    pub fn enter(&mut self, existing: &str, future: &str) -> bool {
        self.path.insert((existing.to_string(), future.to_string()))
    }

    pub fn leave(&mut self, existing: &str, future: &str) {
        self.path.remove(&(existing.to_string(), future.to_string()));
    }

    /// Number of reference hops on the current path
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Named-element lookup within one snapshot
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    definitions: &'a Definitions,
}

impl<'a> Resolver<'a> {
    pub fn new(definitions: &'a Definitions) -> Self {
        Self { definitions }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a ElementShape> {
        self.definitions.get(name)
    }

    /// Flattened properties of a named element
    ///
    /// A name missing from the definitions resolves to an empty set.
    pub fn resolve(&self, name: &str) -> PropertySet {
        match self.lookup(name) {
            Some(shape) => {
                let mut visited = BTreeSet::from([name.to_string()]);
                let mut out = PropertySet::new();
                self.flatten_into(shape, &mut visited, &mut out);
                out
            }
            None => {
                tracing::debug!(element_ref = name, "dangling reference resolved as empty element");
                PropertySet::new()
            }
        }
    }

    /// Own properties merged over those of every composed element
    ///
    /// Each element's `required` names also mark the properties it inherits.
    pub fn flatten(&self, shape: &ElementShape) -> PropertySet {
        let mut visited = BTreeSet::new();
        let mut out = PropertySet::new();
        self.flatten_into(shape, &mut visited, &mut out);
        out
    }

    fn flatten_into(&self, shape: &ElementShape, visited: &mut BTreeSet<String>, out: &mut PropertySet) {
        for target in &shape.all_of {
            if !visited.insert(target.clone()) {
                tracing::debug!(element_ref = %target, "composition already expanded, skipping");
                continue;
            }
            match self.lookup(target) {
                Some(composed) => self.flatten_into(composed, visited, out),
                None => {
                    tracing::debug!(element_ref = %target, "dangling composition reference ignored")
                }
            }
        }
        for (name, property) in &shape.properties {
            out.insert(name.clone(), property.clone());
        }
        shape.apply_required(out);
    }
}
