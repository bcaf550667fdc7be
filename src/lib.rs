//! Overlay - Rule-driven record merging and multiple-inheritance composition
//!
//! This crate re-exports all layers of the Overlay system and offers the
//! free-function entry points, which run on default instances.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: overlay_compose    — Definitions, diamond-aware composition, inherits
//! Layer 1: overlay_rules      — Rule maps, the rule catalog, the merge engine
//! Layer 0: overlay_foundation — Core types (Value, Record, Chain, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use overlay::{Definition, Record, Value, catalog, create, merge};
//!
//! let mut target = Record::new().with("a", Record::new().with("x", 1));
//! let source = Record::new().with("a", Record::new().with("y", 2));
//! merge(&mut target, &source, catalog::deep_replace());
//! assert_eq!(
//!     target.get("a"),
//!     Some(&Value::from(Record::new().with("x", 1).with("y", 2)))
//! );
//!
//! let base = Definition::named("base").with("greeting", "hello").shared();
//! let widget = Definition::named("widget").with("size", 3).implementing(&base).shared();
//! let composed = create(&[], &widget).unwrap();
//! assert_eq!(composed.get("greeting"), Some(&Value::from("hello")));
//! ```

#![recursion_limit = "512"]

pub use overlay_compose as compose;
pub use overlay_foundation as foundation;
pub use overlay_rules as rules;

pub use overlay_compose::{Composed, Composer, Definition, DefinitionRef, Implementor};
pub use overlay_foundation::{Callable, Chain, Error, Func, List, Record, Result, Strategy, Value};
pub use overlay_rules::{MergeConfig, Merger, Rule, RuleMap, catalog};

/// Merges `source` into `target` under `rules` with a default [`Merger`].
///
/// `rules` may be a [`RuleMap`] or a single [`Rule`], which applies to every
/// property.
pub fn merge(target: &mut Record, source: &Record, rules: impl Into<RuleMap>) {
    Merger::new().merge(target, source, &rules.into());
}

/// Composes `definition` with `implementors` using a default [`Composer`].
///
/// # Errors
///
/// See [`Composer::create`].
pub fn create(implementors: &[Implementor], definition: impl Into<Implementor>) -> Result<Composed> {
    Composer::default().create(implementors, definition)
}

/// Returns true if `object` was composed from, or is, `definition`.
///
/// Composed objects stand for the definition they were composed from, in
/// either position.
pub fn inherits(object: impl Into<Implementor>, definition: impl Into<Implementor>) -> bool {
    Composer::default().inherits(object, definition)
}

/// Creates a chain running `members` under `strategy`.
pub fn make_chain<I, C>(strategy: Strategy, members: I) -> Chain
where
    I: IntoIterator<Item = C>,
    C: Into<Callable>,
{
    Chain::with_members(strategy, members)
}
