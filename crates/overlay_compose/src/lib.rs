//! Multiple-inheritance composition of definitions for Overlay.
//!
//! This crate provides:
//! - [`Definition`] - Properties plus base, rules, implement, and lifecycle hooks
//! - [`Implementor`] - A definition or a previously composed object
//! - [`Order`] - Post-order traversal of the implementor graph with diamond dedup
//! - [`Composer`] - `create` and `inherits`
//! - [`Composed`] - The output record together with its [`Lineage`]

#![recursion_limit = "512"]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod composer;
pub mod definition;
pub mod implementor;
pub mod traverse;

pub use composer::Composer;
pub use definition::{BaseFn, BuiltFn, Definition, DefinitionRef, IntegrateFn, MakeFn};
pub use implementor::{Composed, Implementor, Lineage};
pub use traverse::Order;
