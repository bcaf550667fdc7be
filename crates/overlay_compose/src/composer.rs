//! Composition: `create` and `inherits`.

use std::sync::Arc;

use overlay_foundation::{Error, Record, Result, Strategy};
use overlay_rules::{Merger, RuleMap, markers};

use crate::definition::{BuiltFn, Definition, DefinitionRef, IntegrateFn};
use crate::implementor::{Composed, Implementor, Lineage};
use crate::traverse::Order;

/// Builds records from definition graphs.
#[derive(Clone, Debug, Default)]
pub struct Composer {
    merger: Merger,
}

impl Composer {
    /// Creates a composer merging with `merger`.
    #[must_use]
    pub fn new(merger: Merger) -> Self {
        Self { merger }
    }

    /// Returns the merger.
    #[must_use]
    pub fn merger(&self) -> &Merger {
        &self.merger
    }

    /// Composes `target` together with `implementors`.
    ///
    /// The implementors are applied ahead of the target's own, without
    /// changing the target. Each node's properties are merged under the rules
    /// declared by the nodes applied before it; its own rules take effect
    /// from the next node on.
    ///
    /// # Errors
    ///
    /// Returns a usage error when `target` is an already composed object, and
    /// propagates any error raised by a hook, with a frame naming the hook and
    /// its definition.
    pub fn create(&self, implementors: &[Implementor], target: impl Into<Implementor>) -> Result<Composed> {
        let primary = match target.into() {
            Implementor::Definition(definition) => definition,
            Implementor::Composed(lineage) => {
                return Err(Error::usage(format!(
                    "cannot compose onto an object already composed from {}",
                    lineage.primary().name()
                )));
            }
        };
        let lineage = Arc::new(Lineage::new(Arc::clone(&primary), implementors.to_vec()));
        let order = Order::of(&lineage);

        let mut output = match order.base_provider() {
            Some(provider) => {
                tracing::debug!(target: "overlay", provider = provider.name(), "resolving base");
                let base = provider.base().map_or_else(|| Ok(Record::new()), |base| base(&primary));
                base.map_err(|e| hook_error(e, "base", provider))?
            }
            None => Record::new(),
        };

        let mut rules = RuleMap::new();
        let mut integrates: Vec<(&DefinitionRef, &Arc<IntegrateFn>)> = Vec::new();
        let mut built: Vec<(&DefinitionRef, &Arc<BuiltFn>)> = Vec::new();

        for node in order.nodes() {
            let mut overrides = RuleMap::new();
            for (owner, integrate) in &integrates {
                if let Some(map) = integrate(&mut output, node, &primary).map_err(|e| hook_error(e, "integrate", owner))? {
                    overrides = overrides.overlay(&map);
                }
            }

            self.apply(&mut output, node, &rules, &overrides);

            if let Some(own) = node.rules() {
                rules = rules.overlay(own);
            }
            if let Some(make) = node.make() {
                make(&mut output, &primary, node).map_err(|e| hook_error(e, "make", node))?;
            }
            if let Some(integrate) = node.integrate() {
                integrates.push((node, integrate));
            }
            if let Some(hook) = node.built() {
                built.push((node, hook));
            }
        }

        Strategy::LastDefined.fold(&built, |(owner, hook), _| {
            hook(&mut output, &primary).map_err(|e| hook_error(e, "built", owner))?;
            Ok(None)
        })?;

        Ok(Composed::new(output, lineage))
    }

    /// Returns true if `object` was composed from, or is, `definition`.
    ///
    /// Either argument may be a composed object; `definition` then stands for
    /// the definition it was composed from.
    pub fn inherits(&self, object: impl Into<Implementor>, definition: impl Into<Implementor>) -> bool {
        let lineage = match object.into() {
            Implementor::Definition(primary) => Lineage::new(primary, Vec::new()),
            Implementor::Composed(lineage) => Lineage::clone(&lineage),
        };
        Order::of(&lineage).contains(definition.into().definition())
    }

    fn apply(&self, output: &mut Record, node: &Definition, rules: &RuleMap, overrides: &RuleMap) {
        if !self.merger.config().property_markers {
            self.merger.merge(output, node.properties(), &rules.overlay(overrides));
            return;
        }

        let normalized = markers::normalize(node.properties());
        for name in &normalized.collisions {
            self.merger.sink().log(&format!(
                "create: \"{name}\" in {} is shadowed by its unmarked spelling",
                node.name()
            ));
        }
        let effective = rules.overlay(&normalized.rules).overlay(overrides);
        self.merger.merge(output, &normalized.properties, &effective);
    }
}

fn hook_error(err: Error, hook: &str, definition: &Definition) -> Error {
    err.with_frame(format!("{hook} hook of {}", definition.name()))
}
