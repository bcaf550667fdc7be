//! Property-path–scoped rule tables.
//!
//! A [`RuleMap`] maps dot-separated property paths to rules. The first segment
//! of a path names a property of the record being merged (`*` matches any
//! property); the remaining segments apply to that property's own properties
//! when a rule recurses into it.
//!
//! ```text
//! {
//!   "*":         REPLACE,        every property at this level
//!   "options":   EXTEND,         the options property itself
//!   "options.*": FILL,           every property inside options
//!   "*.*":       DEEP_REPLACE,   every property at any depth below this level
//! }
//! ```

use std::fmt;
use std::iter::FromIterator;
use std::sync::Arc;

use crate::rule::Rule;

/// Path segment matching any property.
pub const WILDCARD: &str = "*";

/// Path matching every property at any depth below the current level.
pub const DEEP_WILDCARD: &str = "*.*";

/// Mapping from property path to rule.
#[derive(Clone, Default)]
pub struct RuleMap {
    entries: im::OrdMap<Arc<str>, Rule>,
}

impl RuleMap {
    /// Creates an empty map.
    ///
    /// Merging under an empty map applies the default DEFINE rule everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map applying `rule` to every property.
    #[must_use]
    pub fn single(rule: Rule) -> Self {
        Self::new().with(WILDCARD, rule)
    }

    /// Returns a copy of this map with one more entry (builder style).
    #[must_use]
    pub fn with(mut self, path: impl Into<Arc<str>>, rule: Rule) -> Self {
        self.insert(path, rule);
        self
    }

    /// Sets the rule for a path, returning the previous rule.
    pub fn insert(&mut self, path: impl Into<Arc<str>>, rule: Rule) -> Option<Rule> {
        self.entries.insert(path.into(), rule)
    }

    /// Removes the rule for a path.
    pub fn remove(&mut self, path: &str) -> Option<Rule> {
        self.entries.remove(path)
    }

    /// Returns the rule stored for an exact path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Rule> {
        self.entries.get(path)
    }

    /// Returns true if an exact path has a rule.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over path-rule pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Rule)> {
        self.entries.iter()
    }

    /// Returns an iterator over the paths.
    pub fn paths(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.keys()
    }

    /// Resolves the rule governing `property` at this level: the exact entry,
    /// else the `*` entry. `None` means the default rule applies.
    #[must_use]
    pub fn resolve(&self, property: &str) -> Option<&Rule> {
        self.get(property).or_else(|| self.get(WILDCARD))
    }

    /// Derives the rules governing the properties of `property`.
    ///
    /// Entries whose first segment is `property` or `*` are kept with that
    /// segment stripped; a property-specific entry wins over a wildcard one
    /// for the same remaining path. `*.*` carries over unchanged and also
    /// becomes the `*` fallback when nothing more specific provides one.
    #[must_use]
    pub fn derive(&self, property: &str) -> RuleMap {
        let mut derived = RuleMap::new();
        let mut specific = Vec::new();
        let mut deep = None;

        for (path, rule) in self.iter() {
            if path.as_ref() == DEEP_WILDCARD {
                deep = Some(rule);
                continue;
            }
            let Some((head, rest)) = path.split_once('.') else {
                continue;
            };
            if head == WILDCARD {
                derived.insert(rest, rule.clone());
            } else if head == property {
                specific.push((rest, rule));
            }
        }

        for (rest, rule) in specific {
            derived.insert(rest, rule.clone());
        }

        if let Some(deep) = deep {
            derived.insert(DEEP_WILDCARD, deep.clone());
            if !derived.contains(WILDCARD) {
                derived.insert(WILDCARD, deep.clone());
            }
        }

        derived
    }

    /// Returns a map with every entry of `other` laid over this one.
    #[must_use]
    pub fn overlay(&self, other: &RuleMap) -> RuleMap {
        RuleMap {
            entries: other.entries.clone().union(self.entries.clone()),
        }
    }

    /// Returns a map with `rule` as the `*` entry unless one already exists.
    #[must_use]
    pub fn with_fallback(mut self, rule: Rule) -> RuleMap {
        if !self.contains(WILDCARD) {
            self.insert(WILDCARD, rule);
        }
        self
    }
}

impl From<Rule> for RuleMap {
    fn from(rule: Rule) -> Self {
        Self::single(rule)
    }
}

impl<K: Into<Arc<str>>> FromIterator<(K, Rule)> for RuleMap {
    fn from_iter<I: IntoIterator<Item = (K, Rule)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Debug for RuleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(path, rule)| (path, rule.name())))
            .finish()
    }
}
