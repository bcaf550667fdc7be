//! Rule maps, the built-in rule catalog, and the merge engine for Overlay.
//!
//! This crate provides:
//! - [`Rule`] - A named function combining an existing and an incoming value
//! - [`RuleMap`] - Property-path–scoped rule tables with wildcard fallback
//! - [`catalog`] - The built-in rules, addressable by name
//! - [`Merger`] - Applies a rule map to every property of a record
//! - [`markers`] - `name__` / `__name` property-name markers

#![recursion_limit = "512"]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod markers;
pub mod merge;
pub mod rule;
pub mod rule_map;

pub use catalog::Position;
pub use config::MergeConfig;
pub use markers::Normalized;
pub use merge::Merger;
pub use rule::{Rule, RuleBody, RuleContext};
pub use rule_map::{DEEP_WILDCARD, RuleMap, WILDCARD};
