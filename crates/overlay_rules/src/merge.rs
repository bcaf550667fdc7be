//! The merge loop.
//!
//! [`Merger::merge`] walks the properties of a source record, resolves the rule
//! governing each one, and writes whatever the rule produces into the target.
//! A failing rule never aborts the merge: the fault is reported to the
//! merger's [`LogSink`] and the property is left as it was.

use std::fmt;
use std::sync::Arc;

use overlay_foundation::{Error, List, LogSink, Record, TracingSink, Value};

use crate::catalog;
use crate::config::MergeConfig;
use crate::rule::RuleContext;
use crate::rule_map::RuleMap;

/// Merges records under rule maps.
#[derive(Clone)]
pub struct Merger {
    sink: Arc<dyn LogSink>,
    config: MergeConfig,
}

impl Merger {
    /// Creates a merger with the default configuration, logging to `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            config: MergeConfig::default(),
        }
    }

    /// Builder method to set the log sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: MergeConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Returns the log sink.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Merges every property of `source` into `target`.
    pub fn merge(&self, target: &mut Record, source: &Record, rules: &RuleMap) {
        for (property, incoming) in source.iter() {
            let rule = rules
                .resolve(property)
                .cloned()
                .unwrap_or_else(catalog::define);
            tracing::trace!(target: "overlay", property = %property, rule = rule.name(), "apply rule");
            let ctx = RuleContext::new(self, rules.derive(property));
            let existing = target.get(property).cloned();

            match rule.apply(existing, incoming.clone(), &ctx) {
                Ok(Some(value)) => {
                    target.insert(property.clone(), value);
                }
                Ok(None) => {}
                Err(err) => self.report(property, &err, target, source, ctx.rules()),
            }
        }
    }

    /// Merges `source` into `target` and returns the result.
    #[must_use]
    pub fn merged(&self, mut target: Record, source: &Record, rules: &RuleMap) -> Record {
        self.merge(&mut target, source, rules);
        target
    }

    fn report(&self, property: &str, err: &Error, target: &Record, source: &Record, rules: &RuleMap) {
        self.sink.log(&format!("merge: \"{property}\" {err}"));
        if self.config.dump_on_fault {
            self.sink.dump("target", &Value::Record(target.clone()));
            self.sink.dump("source", &Value::Record(source.clone()));
            let paths: List = rules.paths().map(|p| Value::String(p.clone())).collect();
            self.sink.dump("rules", &Value::List(paths));
        }
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
