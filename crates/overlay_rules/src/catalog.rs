//! Built-in rules.
//!
//! Every built-in is a process-wide shared [`Rule`]: the accessor functions
//! and [`lookup`] hand out clones of the same rule, so
//! `lookup("FILL").unwrap().ptr_eq(&fill())` holds.

use std::sync::LazyLock;

use overlay_foundation::{Callable, Chain, Error, List, Record, Result, Strategy, Type, Value};

use crate::rule::{Rule, RuleContext, expect_record, record_or_fresh};
use crate::rule_map::RuleMap;

/// Names accepted by [`lookup`], aliases excluded.
pub const NAMES: &[&str] = &[
    "DEFINE",
    "REPLACE",
    "FILL",
    "IGNORE",
    "DEEP_REPLACE",
    "DEEP_FILL",
    "STRING_APPEND",
    "STRING_PREPEND",
    "ARRAY_APPEND",
    "ARRAY_PREPEND",
    "CHAIN_APPEND",
    "CHAIN_PREPEND",
    "APPEND",
    "PREPEND",
    "EXTEND",
];

/// Which end of a string, list or chain an incoming value joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// After the existing content.
    Append,
    /// Before the existing content.
    Prepend,
}

static DEFINE: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("DEFINE", |existing, incoming, _| match existing {
        Some(_) => Err(Error::rule_conflict()),
        None => Ok(Some(incoming)),
    })
});

static REPLACE: LazyLock<Rule> = LazyLock::new(|| Rule::new("REPLACE", |_, incoming, _| Ok(Some(incoming))));

static FILL: LazyLock<Rule> = LazyLock::new(|| Rule::new("FILL", |existing, incoming, _| Ok(Some(existing.unwrap_or(incoming)))));

static IGNORE: LazyLock<Rule> = LazyLock::new(|| Rule::new("IGNORE", |_, _, _| Ok(None)));

static DEEP_REPLACE: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("DEEP_REPLACE", |existing, incoming, ctx| match incoming {
        Value::Record(source) => {
            let target = match existing {
                Some(Value::Record(record)) => record,
                _ => Record::new(),
            };
            let rules = RuleMap::single(deep_replace());
            Ok(Some(Value::Record(ctx.merged(target, &source, &rules))))
        }
        other => Ok(Some(other)),
    })
});

static DEEP_FILL: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("DEEP_FILL", |existing, incoming, ctx| match (existing, incoming) {
        (None, Value::Record(source)) => {
            let rules = RuleMap::single(deep_fill());
            Ok(Some(Value::Record(ctx.merged(Record::new(), &source, &rules))))
        }
        (Some(Value::Record(target)), Value::Record(source)) => {
            let rules = RuleMap::single(deep_fill());
            Ok(Some(Value::Record(ctx.merged(target, &source, &rules))))
        }
        (Some(existing), _) => Ok(Some(existing)),
        (None, incoming) => Ok(Some(incoming)),
    })
});

static STRING_APPEND: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("STRING_APPEND", |existing, incoming, _| join_strings(existing, incoming, Position::Append)));

static STRING_PREPEND: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("STRING_PREPEND", |existing, incoming, _| join_strings(existing, incoming, Position::Prepend)));

static ARRAY_APPEND: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("ARRAY_APPEND", |existing, incoming, _| join_lists(existing, incoming, Position::Append)));

static ARRAY_PREPEND: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("ARRAY_PREPEND", |existing, incoming, _| join_lists(existing, incoming, Position::Prepend)));

static CHAIN_APPEND: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("CHAIN_APPEND", |existing, incoming, ctx| {
        join_chain(existing, incoming, ctx.chain_strategy(), Position::Append)
    })
});

static CHAIN_PREPEND: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("CHAIN_PREPEND", |existing, incoming, ctx| {
        join_chain(existing, incoming, ctx.chain_strategy(), Position::Prepend)
    })
});

static APPEND: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("APPEND", |existing, incoming, ctx| dispatch(existing, incoming, ctx, Position::Append))
});

static PREPEND: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("PREPEND", |existing, incoming, ctx| dispatch(existing, incoming, ctx, Position::Prepend))
});

static EXTEND: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new("EXTEND", |existing, incoming, ctx| {
        let source = expect_record(incoming)?;
        let target = record_or_fresh(existing)?;
        Ok(Some(Value::Record(ctx.merged(target, &source, ctx.rules()))))
    })
});

/// Writes the incoming value only where nothing exists yet; redefinition is a
/// [`RuleConflict`](overlay_foundation::ErrorKind::RuleConflict).
#[must_use]
pub fn define() -> Rule {
    DEFINE.clone()
}

/// Always writes the incoming value.
#[must_use]
pub fn replace() -> Rule {
    REPLACE.clone()
}

/// Keeps an existing value, otherwise writes the incoming one.
#[must_use]
pub fn fill() -> Rule {
    FILL.clone()
}

/// Never writes.
#[must_use]
pub fn ignore() -> Rule {
    IGNORE.clone()
}

/// Merges records recursively under DEEP_REPLACE; other values replace.
///
/// An existing value that is not a record is replaced by a fresh record.
#[must_use]
pub fn deep_replace() -> Rule {
    DEEP_REPLACE.clone()
}

/// Merges records recursively under DEEP_FILL; other values fill.
#[must_use]
pub fn deep_fill() -> Rule {
    DEEP_FILL.clone()
}

/// Appends incoming text to the existing string.
#[must_use]
pub fn string_append() -> Rule {
    STRING_APPEND.clone()
}

/// Prepends incoming text to the existing string.
#[must_use]
pub fn string_prepend() -> Rule {
    STRING_PREPEND.clone()
}

/// Appends incoming elements to the existing list.
#[must_use]
pub fn array_append() -> Rule {
    ARRAY_APPEND.clone()
}

/// Prepends incoming elements to the existing list.
#[must_use]
pub fn array_prepend() -> Rule {
    ARRAY_PREPEND.clone()
}

/// Adds the incoming callable to the end of the existing chain.
#[must_use]
pub fn chain_append() -> Rule {
    CHAIN_APPEND.clone()
}

/// Adds the incoming callable to the front of the existing chain.
#[must_use]
pub fn chain_prepend() -> Rule {
    CHAIN_PREPEND.clone()
}

/// Appends by incoming type: records merge structurally, callables chain,
/// strings and lists concatenate, anything else replaces.
#[must_use]
pub fn append() -> Rule {
    APPEND.clone()
}

/// Like [`append`], joining at the front.
#[must_use]
pub fn prepend() -> Rule {
    PREPEND.clone()
}

/// Merges an incoming record under the rules derived for its property.
#[must_use]
pub fn extend() -> Rule {
    EXTEND.clone()
}

/// Looks a built-in rule up by name.
///
/// `CHAIN` is accepted as an alias of `CHAIN_APPEND`.
#[must_use]
pub fn lookup(name: &str) -> Option<Rule> {
    let rule = match name {
        "DEFINE" => define(),
        "REPLACE" => replace(),
        "FILL" => fill(),
        "IGNORE" => ignore(),
        "DEEP_REPLACE" => deep_replace(),
        "DEEP_FILL" => deep_fill(),
        "STRING_APPEND" => string_append(),
        "STRING_PREPEND" => string_prepend(),
        "ARRAY_APPEND" => array_append(),
        "ARRAY_PREPEND" => array_prepend(),
        "CHAIN_APPEND" | "CHAIN" => chain_append(),
        "CHAIN_PREPEND" => chain_prepend(),
        "APPEND" => append(),
        "PREPEND" => prepend(),
        "EXTEND" => extend(),
        _ => return None,
    };
    Some(rule)
}

/// Makes a rule that turns the existing value into a chain running under
/// `strategy` and joins the incoming callable at `position`.
///
/// Unlike [`chain_append`], the strategy is fixed by the rule rather than
/// taken from the merger's configuration.
#[must_use]
pub fn chain_rule(strategy: Strategy, position: Position) -> Rule {
    let name = match position {
        Position::Append => format!("CHAIN_APPEND({})", strategy.name()),
        Position::Prepend => format!("CHAIN_PREPEND({})", strategy.name()),
    };
    Rule::new(name, move |existing, incoming, _| join_chain(existing, incoming, strategy.clone(), position))
}

fn join_strings(existing: Option<Value>, incoming: Value, position: Position) -> Result<Option<Value>> {
    let Value::String(incoming) = incoming else {
        return Err(Error::type_mismatch(Type::String, incoming.value_type()));
    };
    let existing = match existing {
        None => return Ok(Some(Value::String(incoming))),
        Some(Value::String(s)) => s,
        Some(other) => return Err(Error::type_mismatch(Type::String, other.value_type())),
    };
    let joined = match position {
        Position::Append => format!("{existing}{incoming}"),
        Position::Prepend => format!("{incoming}{existing}"),
    };
    Ok(Some(Value::from(joined)))
}

fn join_lists(existing: Option<Value>, incoming: Value, position: Position) -> Result<Option<Value>> {
    let incoming = match incoming {
        Value::List(list) => list,
        single => {
            let mut list = List::new();
            list.push_back(single);
            list
        }
    };
    let existing = match existing {
        None => return Ok(Some(Value::List(incoming))),
        Some(Value::List(list)) => list,
        Some(other) => return Err(Error::type_mismatch(Type::List, other.value_type())),
    };
    let joined = match position {
        Position::Append => existing.concat(&incoming),
        Position::Prepend => incoming.concat(&existing),
    };
    Ok(Some(Value::List(joined)))
}

fn join_chain(
    existing: Option<Value>,
    incoming: Value,
    strategy: Strategy,
    position: Position,
) -> Result<Option<Value>> {
    let member = Callable::try_from(incoming)?;
    let mut chain = Chain::coerce(existing, strategy)?;
    match position {
        Position::Append => chain.add(member),
        Position::Prepend => chain.add_first(member),
    };
    Ok(Some(Value::Chain(chain)))
}

fn dispatch(
    existing: Option<Value>,
    incoming: Value,
    ctx: &RuleContext<'_>,
    position: Position,
) -> Result<Option<Value>> {
    match incoming {
        Value::Record(source) => {
            let target = record_or_fresh(existing)?;
            let fallback = match position {
                Position::Append => append(),
                Position::Prepend => prepend(),
            };
            let rules = ctx.rules().clone().with_fallback(fallback);
            Ok(Some(Value::Record(ctx.merged(target, &source, &rules))))
        }
        incoming @ (Value::Func(_) | Value::Chain(_)) => {
            join_chain(existing, incoming, ctx.chain_strategy(), position)
        }
        incoming @ Value::String(_) => join_strings(existing, incoming, position),
        incoming @ Value::List(_) => join_lists(existing, incoming, position),
        other => Ok(Some(other)),
    }
}
