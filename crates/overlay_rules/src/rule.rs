//! Rule functions and the context they run in.

use std::fmt;
use std::sync::Arc;

use overlay_foundation::{Error, Record, Result, Strategy, Type, Value};

use crate::merge::Merger;
use crate::rule_map::RuleMap;

/// Signature of a rule body: `(existing, incoming, ctx) -> output`.
///
/// `existing` is the target's current value (absent if the property is not
/// set), `incoming` is the source value. `Ok(None)` leaves the target as it is;
/// an error is reported by the merger and also leaves the target as it is.
pub type RuleBody = dyn Fn(Option<Value>, Value, &RuleContext<'_>) -> Result<Option<Value>> + Send + Sync;

/// A named rule deciding how one property's existing and incoming values combine.
///
/// Cloning shares the body; [`Rule::ptr_eq`] tells whether two rules are the
/// same function.
#[derive(Clone)]
pub struct Rule {
    name: Arc<str>,
    body: Arc<RuleBody>,
}

impl Rule {
    /// Creates a rule from a function.
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(Option<Value>, Value, &RuleContext<'_>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    /// A rule that merges record values under a fixed rule map, ignoring the
    /// rules derived from the surrounding merge.
    #[must_use]
    pub fn nested(rules: RuleMap) -> Self {
        Self::new("NESTED", move |existing, incoming, ctx| {
            let target = record_or_fresh(existing)?;
            let source = expect_record(incoming)?;
            Ok(Some(Value::Record(ctx.merged(target, &source, &rules))))
        })
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the rule.
    ///
    /// # Errors
    ///
    /// Propagates whatever the rule body returns.
    pub fn apply(
        &self,
        existing: Option<Value>,
        incoming: Value,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Value>> {
        (self.body)(existing, incoming, ctx)
    }

    /// Returns true if both rules share the same body.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<rule {}>", self.name)
    }
}

/// What a rule can see besides its operands.
pub struct RuleContext<'a> {
    merger: &'a Merger,
    rules: RuleMap,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one property.
    #[must_use]
    pub fn new(merger: &'a Merger, rules: RuleMap) -> Self {
        Self { merger, rules }
    }

    /// The rules derived for the property being merged.
    #[must_use]
    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }

    /// The merger running this rule.
    #[must_use]
    pub fn merger(&self) -> &'a Merger {
        self.merger
    }

    /// The strategy used when a value has to be turned into a chain.
    #[must_use]
    pub fn chain_strategy(&self) -> Strategy {
        self.merger.config().chain_strategy.clone()
    }

    /// Merges `source` into `target` with the same merger, returning the result.
    #[must_use]
    pub fn merged(&self, target: Record, source: &Record, rules: &RuleMap) -> Record {
        self.merger.merged(target, source, rules)
    }
}

/// The existing value as a record, or a fresh record when absent.
pub(crate) fn record_or_fresh(existing: Option<Value>) -> Result<Record> {
    match existing {
        None => Ok(Record::new()),
        Some(Value::Record(record)) => Ok(record),
        Some(other) => Err(Error::type_mismatch(Type::Record, other.value_type())),
    }
}

pub(crate) fn expect_record(incoming: Value) -> Result<Record> {
    match incoming {
        Value::Record(record) => Ok(record),
        other => Err(Error::type_mismatch(Type::Record, other.value_type())),
    }
}
