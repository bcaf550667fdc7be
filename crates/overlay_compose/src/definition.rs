//! Definitions: property bags with composition controls.

use std::fmt;
use std::sync::Arc;

use overlay_foundation::{Record, Result, Value};
use overlay_rules::RuleMap;

use crate::implementor::Implementor;

/// A definition shared between the compositions that implement it.
///
/// Identity is pointer identity of the `Arc`.
pub type DefinitionRef = Arc<Definition>;

/// Produces the initial output record; called with the primary definition.
pub type BaseFn = dyn Fn(&Definition) -> Result<Record> + Send + Sync;

/// Runs after a node is merged: `(output, primary, node)`.
pub type MakeFn = dyn Fn(&mut Record, &Definition, &Definition) -> Result<()> + Send + Sync;

/// Runs before each later node is merged: `(output, node, primary)`.
///
/// A returned rule map is laid over the accumulated rules for that node only.
pub type IntegrateFn = dyn Fn(&mut Record, &Definition, &Definition) -> Result<Option<RuleMap>> + Send + Sync;

/// Runs once after the whole graph is applied: `(output, primary)`.
pub type BuiltFn = dyn Fn(&mut Record, &Definition) -> Result<()> + Send + Sync;

/// Properties plus the reserved composition controls.
///
/// Built with the `with_*` methods and then shared with [`Definition::shared`];
/// nothing in the engine writes to a definition.
#[derive(Clone, Default)]
pub struct Definition {
    name: Option<Arc<str>>,
    properties: Record,
    base: Option<Arc<BaseFn>>,
    rules: Option<RuleMap>,
    implement: im::Vector<Implementor>,
    reinherit: bool,
    make: Option<Arc<MakeFn>>,
    integrate: Option<Arc<IntegrateFn>>,
    built: Option<Arc<BuiltFn>>,
}

impl Definition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty definition with a diagnostic name.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Wraps the definition for sharing.
    #[must_use]
    pub fn shared(self) -> DefinitionRef {
        Arc::new(self)
    }

    /// Builder method to add a property.
    #[must_use]
    pub fn with(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// Builder method to replace all properties.
    #[must_use]
    pub fn with_properties(mut self, properties: Record) -> Self {
        self.properties = properties;
        self
    }

    /// Builder method to set the base factory.
    #[must_use]
    pub fn with_base<F>(mut self, base: F) -> Self
    where
        F: Fn(&Definition) -> Result<Record> + Send + Sync + 'static,
    {
        self.base = Some(Arc::new(base));
        self
    }

    /// Builder method to set the rules this definition hands to later nodes.
    #[must_use]
    pub fn with_rules(mut self, rules: impl Into<RuleMap>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Builder method to add an implementor.
    #[must_use]
    pub fn implementing(mut self, implementor: impl Into<Implementor>) -> Self {
        self.implement.push_back(implementor.into());
        self
    }

    /// Builder method to mark the definition as applied every time it is reached.
    #[must_use]
    pub fn reinherit(mut self) -> Self {
        self.reinherit = true;
        self
    }

    /// Builder method to set the make hook.
    #[must_use]
    pub fn with_make<F>(mut self, make: F) -> Self
    where
        F: Fn(&mut Record, &Definition, &Definition) -> Result<()> + Send + Sync + 'static,
    {
        self.make = Some(Arc::new(make));
        self
    }

    /// Builder method to set the integrate hook.
    #[must_use]
    pub fn with_integrate<F>(mut self, integrate: F) -> Self
    where
        F: Fn(&mut Record, &Definition, &Definition) -> Result<Option<RuleMap>> + Send + Sync + 'static,
    {
        self.integrate = Some(Arc::new(integrate));
        self
    }

    /// Builder method to set the built hook.
    #[must_use]
    pub fn with_built<F>(mut self, built: F) -> Self
    where
        F: Fn(&mut Record, &Definition) -> Result<()> + Send + Sync + 'static,
    {
        self.built = Some(Arc::new(built));
        self
    }

    /// Returns the diagnostic name, `"anonymous"` when none was given.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    /// Returns the properties.
    #[must_use]
    pub fn properties(&self) -> &Record {
        &self.properties
    }

    /// Returns a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns the rules declared for later nodes.
    #[must_use]
    pub fn rules(&self) -> Option<&RuleMap> {
        self.rules.as_ref()
    }

    /// Returns the implementors, in declaration order.
    pub fn implement(&self) -> impl Iterator<Item = &Implementor> {
        self.implement.iter()
    }

    /// Returns true if the definition is applied every time it is reached.
    #[must_use]
    pub fn is_reinherit(&self) -> bool {
        self.reinherit
    }

    /// Returns the base factory.
    #[must_use]
    pub fn base(&self) -> Option<&Arc<BaseFn>> {
        self.base.as_ref()
    }

    /// Returns the make hook.
    #[must_use]
    pub fn make(&self) -> Option<&Arc<MakeFn>> {
        self.make.as_ref()
    }

    /// Returns the integrate hook.
    #[must_use]
    pub fn integrate(&self) -> Option<&Arc<IntegrateFn>> {
        self.integrate.as_ref()
    }

    /// Returns the built hook.
    #[must_use]
    pub fn built(&self) -> Option<&Arc<BuiltFn>> {
        self.built.as_ref()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks = Vec::new();
        if self.base.is_some() {
            hooks.push("base");
        }
        if self.make.is_some() {
            hooks.push("make");
        }
        if self.integrate.is_some() {
            hooks.push("integrate");
        }
        if self.built.is_some() {
            hooks.push("built");
        }
        f.debug_struct("Definition")
            .field("name", &self.name())
            .field("properties", &self.properties)
            .field("rules", &self.rules)
            .field("implement", &self.implement.len())
            .field("reinherit", &self.reinherit)
            .field("hooks", &hooks)
            .finish()
    }
}
