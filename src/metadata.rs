//! Optional EDM schema descriptor consulted during parsing.

use smol_str::SmolStr;
use std::collections::BTreeSet;

/// A read-only schema descriptor threaded through the combinators.
///
/// An empty descriptor (the default) places no constraints: any
/// well-formed name parses, and resource-path heads are classified as
/// entity sets. A populated descriptor restricts the resource-path head to
/// the registered names and distinguishes singletons from entity sets.
/// Combinators only read it; parsing never mutates the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entity_sets: BTreeSet<SmolStr>,
    singletons: BTreeSet<SmolStr>,
}

impl Metadata {
    /// Creates an empty descriptor that accepts any well-formed name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity set name.
    pub fn with_entity_set(mut self, name: impl Into<SmolStr>) -> Self {
        self.entity_sets.insert(name.into());
        self
    }

    /// Registers a singleton name.
    pub fn with_singleton(mut self, name: impl Into<SmolStr>) -> Self {
        self.singletons.insert(name.into());
        self
    }

    /// Returns true when no names are registered.
    pub fn is_empty(&self) -> bool {
        self.entity_sets.is_empty() && self.singletons.is_empty()
    }

    /// Returns true when `name` is a registered singleton.
    pub fn is_singleton(&self, name: &str) -> bool {
        self.singletons.contains(name)
    }

    /// Returns true when `name` may start a resource path.
    pub fn resolves_head(&self, name: &str) -> bool {
        self.is_empty() || self.entity_sets.contains(name) || self.singletons.contains(name)
    }
}
