//! Property-name markers.
//!
//! A trailing `__` asks for the incoming value to be appended to what is
//! already there, a leading `__` for it to be prepended:
//!
//! ```text
//! { "init__": f }   ->  { "init": f }  with  { "init": APPEND }
//! { "__init": f }   ->  { "init": f }  with  { "init": PREPEND }
//! ```
//!
//! Markers are parsed once per record by [`normalize`], which produces the
//! plain record together with the rule map the markers stand for.

use std::sync::Arc;

use overlay_foundation::Record;

use crate::catalog::{self, Position};
use crate::rule_map::RuleMap;

const MARKER: &str = "__";

/// Splits a marked property name into its plain name and position.
///
/// Names marked at both ends, or at neither, are not markers.
#[must_use]
pub fn parse(name: &str) -> Option<(&str, Position)> {
    let leading = name.strip_prefix(MARKER);
    let trailing = name.strip_suffix(MARKER);
    match (leading, trailing) {
        (Some(plain), None) if !plain.is_empty() => Some((plain, Position::Prepend)),
        (None, Some(plain)) if !plain.is_empty() => Some((plain, Position::Append)),
        _ => None,
    }
}

/// A record with its markers parsed out.
#[derive(Clone, Debug, Default)]
pub struct Normalized {
    /// The properties under their plain names.
    pub properties: Record,
    /// APPEND / PREPEND entries for every marked property that was kept.
    pub rules: RuleMap,
    /// Marked names dropped because the plain name was also present.
    pub collisions: Vec<Arc<str>>,
}

impl Normalized {
    /// Returns true if no property carried a marker.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.rules.is_empty() && self.collisions.is_empty()
    }
}

/// Parses the markers of every property in `record`.
///
/// When a marked and an unmarked spelling name the same property, the
/// unmarked one wins and the marked name is listed in
/// [`Normalized::collisions`].
#[must_use]
pub fn normalize(record: &Record) -> Normalized {
    let mut normalized = Normalized {
        properties: Record::new(),
        rules: RuleMap::new(),
        collisions: Vec::new(),
    };

    let (marked, plain): (Vec<_>, Vec<_>) = record
        .iter()
        .partition(|(name, _)| parse(name).is_some());

    for (name, value) in plain {
        normalized.properties.insert(name.clone(), value.clone());
    }

    for (name, value) in marked {
        let Some((plain, position)) = parse(name) else {
            continue;
        };
        if normalized.properties.contains_key(plain) {
            normalized.collisions.push(name.clone());
            continue;
        }
        let rule = match position {
            Position::Append => catalog::append(),
            Position::Prepend => catalog::prepend(),
        };
        normalized.properties.insert(plain, value.clone());
        normalized.rules.insert(plain, rule);
    }

    normalized
}
