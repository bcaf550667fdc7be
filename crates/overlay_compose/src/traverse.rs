//! Implementor-graph traversal.
//!
//! The graph is walked depth-first, left to right, and each definition is
//! emitted after everything it implements (post-order). A definition already
//! reached earlier in the same walk is skipped together with its subtree,
//! unless it is marked `reinherit`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::definition::{Definition, DefinitionRef};
use crate::implementor::{Implementor, Lineage};

/// Definitions in the order they are applied.
#[derive(Clone, Debug, Default)]
pub struct Order {
    nodes: Vec<DefinitionRef>,
}

impl Order {
    /// Walks a lineage: its creation implementors, then the primary's own
    /// implementors, then the primary itself.
    #[must_use]
    pub fn of(lineage: &Lineage) -> Self {
        let mut order = Self::default();
        let mut visited = HashSet::new();
        order.enter(&lineage.primary, &lineage.implementors, &mut visited);
        order
    }

    /// Returns the definitions in application order.
    #[must_use]
    pub fn nodes(&self) -> &[DefinitionRef] {
        &self.nodes
    }

    /// Returns the number of applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing is applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `definition` is reached anywhere in the walk.
    #[must_use]
    pub fn contains(&self, definition: &DefinitionRef) -> bool {
        self.nodes.iter().any(|node| Arc::ptr_eq(node, definition))
    }

    /// Returns the first definition, in application order, declaring a base.
    #[must_use]
    pub fn base_provider(&self) -> Option<&DefinitionRef> {
        self.nodes.iter().find(|node| node.base().is_some())
    }

    fn enter(
        &mut self,
        definition: &DefinitionRef,
        extra: &[Implementor],
        visited: &mut HashSet<*const Definition>,
    ) {
        visited.insert(Arc::as_ptr(definition));
        for implementor in extra.iter().chain(definition.implement()) {
            self.visit(implementor, visited);
        }
        self.nodes.push(Arc::clone(definition));
    }

    fn visit(&mut self, implementor: &Implementor, visited: &mut HashSet<*const Definition>) {
        let (definition, extra): (&DefinitionRef, &[Implementor]) = match implementor {
            Implementor::Definition(definition) => (definition, &[]),
            Implementor::Composed(lineage) => (&lineage.primary, &lineage.implementors),
        };
        if visited.contains(&Arc::as_ptr(definition)) && !definition.is_reinherit() {
            tracing::trace!(target: "overlay", definition = definition.name(), "skipping repeated definition");
            return;
        }
        self.enter(definition, extra, visited);
    }
}
