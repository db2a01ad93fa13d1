//! Learned correspondence between trace material keys and model compositions.
//!
//! The map starts empty. The first point seen for a key binds it to the
//! composition found at that point; every later point with the same key is
//! checked against that binding. A key is never rebound.

use std::collections::BTreeMap;

use oracle_types::EquivalenceKey;

/// Result of checking one observation against the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Equivalence {
    /// The key was unknown and is now bound to the observed composition.
    Bound,
    /// The key was already bound to the observed composition.
    Matches,
    /// The key is bound to a different composition.
    Conflicts { bound: String },
}

#[derive(Debug, Clone, Default)]
pub struct EquivalenceMap {
    bindings: BTreeMap<EquivalenceKey, String>,
}

impl EquivalenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, key: &EquivalenceKey) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &EquivalenceKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Check an observation, binding the key if this is its first one.
    pub fn check_or_bind(&mut self, key: EquivalenceKey, composition: &str) -> Equivalence {
        match self.bindings.get(&key) {
            None => {
                self.bindings.insert(key, composition.to_string());
                Equivalence::Bound
            }
            Some(bound) if bound == composition => Equivalence::Matches,
            Some(bound) => Equivalence::Conflicts {
                bound: bound.clone(),
            },
        }
    }

    /// Bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&EquivalenceKey, &str)> {
        self.bindings.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Render the learned table, one binding per line.
    pub fn to_text(&self) -> String {
        let mut out = format!("Learned equivalences ({}):\n", self.bindings.len());
        for (key, composition) in self.iter() {
            out.push_str(&format!(
                "  material {:>6} @ density {:<12} -> {}\n",
                key.material.0,
                key.density(),
                composition
            ));
        }
        out
    }
}
