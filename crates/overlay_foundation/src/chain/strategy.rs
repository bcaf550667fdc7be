//! Execution strategies for function chains.
//!
//! Synchronous strategies are plain folds over the member list and are exposed
//! through [`Strategy::fold`] for any member type. The asynchronous strategies
//! are continuation-passing and only run through a [`Chain`](super::Chain).

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::Member;
use crate::func::{Callable, Func};
use crate::value::Value;
use crate::{Error, Result};

/// Signature of a user-supplied strategy: `(this, args, members)`.
pub type StrategyFn = dyn Fn(&mut Value, &[Value], &[Callable]) -> Result<Option<Value>> + Send + Sync;

/// How a chain combines the calls of its members.
#[derive(Clone, Default)]
pub enum Strategy {
    /// Runs every member; the result is the last defined output. Once a value
    /// is defined it is passed as a trailing argument to later members.
    #[default]
    LastDefined,
    /// Runs members until one returns a value, and returns it.
    StopAtDefined,
    /// If the first member returns a value the rest are skipped; otherwise the
    /// rest run. Produces no value.
    StopFirstDefined,
    /// Continuation passing: each member receives a `next` function that runs
    /// the following member. A trailing callable argument is the completion
    /// callback.
    SequentialAsync,
    /// Fan-out: every member receives its own `done` function; the completion
    /// callback fires once all of them have been called.
    ParallelAsync,
    /// Logical AND over every member output, starting from `true`.
    All,
    /// Logical OR over every member output, starting from `false`.
    Any,
    /// A user-defined strategy.
    Custom(CustomStrategy),
}

/// A named user-defined strategy.
#[derive(Clone)]
pub struct CustomStrategy {
    name: Arc<str>,
    run: Arc<StrategyFn>,
}

impl CustomStrategy {
    /// Returns the strategy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the strategy over `members`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the strategy returns.
    pub fn run(&self, this: &mut Value, args: &[Value], members: &[Callable]) -> Result<Option<Value>> {
        (self.run)(this, args, members)
    }
}

impl Strategy {
    /// Creates a custom strategy.
    pub fn custom<F>(name: impl Into<Arc<str>>, run: F) -> Self
    where
        F: Fn(&mut Value, &[Value], &[Callable]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self::Custom(CustomStrategy {
            name: name.into(),
            run: Arc::new(run),
        })
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::LastDefined => "last-defined",
            Self::StopAtDefined => "stop-at-defined",
            Self::StopFirstDefined => "stop-first-defined",
            Self::SequentialAsync => "sequential-async",
            Self::ParallelAsync => "parallel-async",
            Self::All => "all",
            Self::Any => "any",
            Self::Custom(custom) => custom.name(),
        }
    }

    /// Returns true for the continuation-passing strategies.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(self, Self::SequentialAsync | Self::ParallelAsync)
    }

    /// Folds a synchronous strategy over `members`.
    ///
    /// `invoke` is called once per member that the strategy runs; its second
    /// argument is the running result that `LastDefined` threads through.
    ///
    /// # Errors
    ///
    /// Returns a usage error for asynchronous and custom strategies, and stops
    /// at the first error `invoke` returns.
    pub fn fold<M, F>(&self, members: &[M], mut invoke: F) -> Result<Option<Value>>
    where
        F: FnMut(&M, Option<&Value>) -> Result<Option<Value>>,
    {
        match self {
            Self::LastDefined => {
                let mut output = None;
                for member in members {
                    if let Some(value) = invoke(member, output.as_ref())? {
                        output = Some(value);
                    }
                }
                Ok(output)
            }
            Self::StopAtDefined => {
                for member in members {
                    if let Some(value) = invoke(member, None)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
            Self::StopFirstDefined => {
                let Some((first, rest)) = members.split_first() else {
                    return Ok(None);
                };
                if invoke(first, None)?.is_some() {
                    return Ok(None);
                }
                for member in rest {
                    invoke(member, None)?;
                }
                Ok(None)
            }
            Self::All => {
                let mut all = true;
                for member in members {
                    let out = invoke(member, None)?;
                    all = out.is_some_and(|v| v.is_truthy()) && all;
                }
                Ok(Some(Value::Bool(all)))
            }
            Self::Any => {
                let mut any = false;
                for member in members {
                    let out = invoke(member, None)?;
                    any = out.is_some_and(|v| v.is_truthy()) || any;
                }
                Ok(Some(Value::Bool(any)))
            }
            Self::SequentialAsync | Self::ParallelAsync | Self::Custom(_) => Err(Error::usage(
                format!("strategy {} cannot be folded outside a chain", self.name()),
            )),
        }
    }
}

impl PartialEq for Strategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(&a.run, &b.run),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits a trailing callable off the argument list.
fn split_completion(args: &[Value]) -> (&[Value], Option<Callable>) {
    match args.split_last() {
        Some((last, rest)) if last.is_callable() => (rest, last.to_callable()),
        _ => (args, None),
    }
}

fn with_trailing(args: &[Value], last: Value) -> Vec<Value> {
    let mut all = Vec::with_capacity(args.len() + 1);
    all.extend_from_slice(args);
    all.push(last);
    all
}

/// Runs members one after another, each handing over through `next`.
pub(super) fn run_sequential(
    this: &mut Value,
    args: &[Value],
    members: &im::Vector<Member>,
) -> Result<Option<Value>> {
    let (args, done) = split_completion(args);
    advance(this, members, 0, &Arc::from(args), done.as_ref(), &[])
}

fn advance(
    this: &mut Value,
    members: &im::Vector<Member>,
    start: usize,
    args: &Arc<[Value]>,
    done: Option<&Callable>,
    results: &[Value],
) -> Result<Option<Value>> {
    for index in start..members.len() {
        let member = &members[index];
        if member.is_spent() {
            continue;
        }
        // A member that declares no room for the continuation is run
        // synchronously and the chain moves on by itself.
        if member.callable.arity().is_none_or(|n| n > args.len()) {
            let next = continuation(members.clone(), index + 1, Arc::clone(args), done.cloned());
            member.invoke(this, &with_trailing(args, Value::Func(next)))?;
            return Ok(None);
        }
        member.invoke(this, args)?;
    }
    match done {
        Some(done) => done.call(this, results),
        None => Ok(None),
    }
}

fn continuation(
    members: im::Vector<Member>,
    index: usize,
    args: Arc<[Value]>,
    done: Option<Callable>,
) -> Func {
    let fired = AtomicBool::new(false);
    Func::new("next", move |this, results| {
        if fired.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: "overlay", "ignoring repeated continuation call");
            return Ok(None);
        }
        advance(this, &members, index, &args, done.as_ref(), results)
    })
}

/// Runs every member with its own completion callback.
pub(super) fn run_parallel(
    this: &mut Value,
    args: &[Value],
    members: &im::Vector<Member>,
) -> Result<Option<Value>> {
    let (args, done) = split_completion(args);
    let live: Vec<&Member> = members.iter().filter(|m| !m.is_spent()).collect();
    let total = live.len();
    if total == 0 {
        return match done {
            Some(done) => done.call(this, &[]),
            None => Ok(None),
        };
    }

    let counter = Arc::new(AtomicUsize::new(0));
    for member in live {
        let counter = Arc::clone(&counter);
        let done = done.clone();
        let callback = Func::new("done", move |this, _| {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 == total {
                if let Some(done) = &done {
                    return done.call(this, &[]);
                }
            }
            Ok(None)
        });
        member.invoke(this, &with_trailing(args, Value::Func(callback)))?;
    }
    Ok(None)
}
