//! The accumulating edge set of confirmed dependencies.

use crate::pair::Pair;
use serde::{Deserialize, Serialize};

/// Confirmed directed dependencies, with set semantics.
///
/// Insertion order is preserved so renders and persisted records are stable,
/// but it carries no graph meaning. Duplicate insertion is a no-op, never an
/// error, so retried confirmations are safe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSet {
    edges: Vec<Pair>,
}

impl EdgeSet {
    /// Create an empty edge set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a confirmed dependency. Returns `true` if it was newly
    /// inserted, `false` if it was already present.
    pub fn insert(&mut self, pair: Pair) -> bool {
        if self.edges.contains(&pair) {
            return false;
        }
        self.edges.push(pair);
        true
    }

    /// Whether the given dependency has been confirmed
    pub fn contains(&self, pair: &Pair) -> bool {
        self.edges.contains(pair)
    }

    /// Iterate over confirmed dependencies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.edges.iter()
    }

    /// Number of confirmed dependencies
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no dependency has been confirmed yet
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Confirmed dependencies as a slice, in insertion order
    pub fn as_slice(&self) -> &[Pair] {
        &self.edges
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
