//! Function chains.
//!
//! A [`Chain`] is an ordered list of callables plus a [`Strategy`] that decides
//! how their calls are combined. A chain is itself invocable, so it can sit in a
//! record wherever a function can, and can be a member of another chain.
//!
//! Chains are values: a clone carries its own copy of the run-once state of
//! its members, and mutators only touch the chain they are called on.
//!
//! ```
//! use overlay_foundation::{Chain, Func, Strategy, Value};
//!
//! let mut chain = Chain::new(Strategy::StopAtDefined);
//! chain.add(Func::new("skip", |_, _| Ok(None)));
//! chain.add(Func::new("answer", |_, _| Ok(Some(Value::Int(42)))));
//!
//! let mut this = Value::Null;
//! assert_eq!(chain.call(&mut this, &[]).unwrap(), Some(Value::Int(42)));
//! ```

mod strategy;

pub use strategy::{CustomStrategy, Strategy, StrategyFn};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::collections::Record;
use crate::func::{Callable, Func};
use crate::types::Type;
use crate::value::Value;
use crate::{Error, Result};

/// A chain member: a callable, optionally limited to a single invocation.
///
/// Plain clones share the run-once flag; [`Member::fork`] does not.
#[derive(Clone)]
pub(crate) struct Member {
    pub(crate) callable: Callable,
    spent: Option<Arc<AtomicBool>>,
}

impl Member {
    fn new(callable: Callable) -> Self {
        Self {
            callable,
            spent: None,
        }
    }

    fn once(callable: Callable) -> Self {
        Self {
            callable,
            spent: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    fn fork(&self) -> Self {
        Self {
            callable: self.callable.clone(),
            spent: self
                .spent
                .as_ref()
                .map(|spent| Arc::new(AtomicBool::new(spent.load(Ordering::SeqCst)))),
        }
    }

    pub(crate) fn is_spent(&self) -> bool {
        self.spent
            .as_ref()
            .is_some_and(|spent| spent.load(Ordering::SeqCst))
    }

    pub(crate) fn invoke(&self, this: &mut Value, args: &[Value]) -> Result<Option<Value>> {
        if let Some(spent) = &self.spent {
            if spent.swap(true, Ordering::SeqCst) {
                return Ok(None);
            }
        }
        self.callable.call(this, args)
    }
}

/// An invocable, ordered list of functions with a pluggable execution strategy.
#[derive(Default)]
pub struct Chain {
    strategy: Strategy,
    members: im::Vector<Member>,
    scope: Option<Arc<Value>>,
}

impl Clone for Chain {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy.clone(),
            members: self.members.iter().map(Member::fork).collect(),
            scope: self.scope.clone(),
        }
    }
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            members: im::Vector::new(),
            scope: None,
        }
    }

    /// Creates a chain with initial members.
    pub fn with_members<I, C>(strategy: Strategy, members: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Callable>,
    {
        Self {
            strategy,
            members: members.into_iter().map(|m| Member::new(m.into())).collect(),
            scope: None,
        }
    }

    /// Turns an optional value into a chain.
    ///
    /// Absent values become an empty chain, chains are returned as they are,
    /// and a plain function becomes the first member of a new chain.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch for values that are not callable.
    pub fn coerce(value: Option<Value>, strategy: Strategy) -> Result<Self> {
        match value {
            None => Ok(Self::new(strategy)),
            Some(Value::Chain(chain)) => Ok(chain),
            Some(Value::Func(func)) => Ok(Self::with_members(strategy, [func])),
            Some(other) => Err(Error::type_mismatch(Type::Callable, other.value_type())),
        }
    }

    /// Returns the execution strategy.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Replaces the execution strategy.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    /// Returns the number of members, spent ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the chain has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns an iterator over the members in call order.
    pub fn members(&self) -> impl Iterator<Item = &Callable> {
        self.members.iter().map(|m| &m.callable)
    }

    /// Appends a member.
    pub fn add(&mut self, member: impl Into<Callable>) -> &mut Self {
        self.members.push_back(Member::new(member.into()));
        self
    }

    /// Prepends a member.
    pub fn add_first(&mut self, member: impl Into<Callable>) -> &mut Self {
        self.members.push_front(Member::new(member.into()));
        self
    }

    /// Appends a member that only runs on the first invocation.
    pub fn add_once(&mut self, member: impl Into<Callable>) -> &mut Self {
        self.members.push_back(Member::once(member.into()));
        self
    }

    /// Prepends a member that only runs on the first invocation.
    pub fn add_first_once(&mut self, member: impl Into<Callable>) -> &mut Self {
        self.members.push_front(Member::once(member.into()));
        self
    }

    /// Removes the first member that is `member` by identity.
    ///
    /// Returns true if a member was removed.
    pub fn remove(&mut self, member: &Callable) -> bool {
        let found = self.members.iter().position(|m| m.callable.ptr_eq(member));
        if let Some(index) = found {
            self.members.remove(index);
        }
        found.is_some()
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Fixes the receiver used for every call, or unfixes it with `None`.
    ///
    /// Each call runs on a fresh copy of the bound value, so writes members
    /// make to `this` are discarded when the call returns and the bound
    /// value itself never changes.
    pub fn bind_scope(&mut self, scope: Option<Value>) {
        self.scope = scope.map(Arc::new);
    }

    /// Returns the bound receiver, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&Value> {
        self.scope.as_deref()
    }

    /// Invokes the chain.
    ///
    /// A bound scope replaces `this` for the duration of the call. An empty
    /// synchronous chain produces no value without running its strategy;
    /// asynchronous chains still complete.
    ///
    /// # Errors
    ///
    /// Member errors propagate to the caller.
    pub fn call(&self, this: &mut Value, args: &[Value]) -> Result<Option<Value>> {
        match &self.scope {
            Some(scope) => {
                let mut bound = Value::clone(scope);
                self.run(&mut bound, args)
            }
            None => self.run(this, args),
        }
    }

    fn run(&self, this: &mut Value, args: &[Value]) -> Result<Option<Value>> {
        match &self.strategy {
            Strategy::SequentialAsync => strategy::run_sequential(this, args, &self.members),
            Strategy::ParallelAsync => strategy::run_parallel(this, args, &self.members),
            Strategy::Custom(custom) => {
                let live: Vec<Callable> = self
                    .members
                    .iter()
                    .filter(|m| !m.is_spent())
                    .map(|m| {
                        if let Some(spent) = &m.spent {
                            spent.store(true, Ordering::SeqCst);
                        }
                        m.callable.clone()
                    })
                    .collect();
                custom.run(this, args, &live)
            }
            sync => {
                let live: Vec<&Member> = self.members.iter().filter(|m| !m.is_spent()).collect();
                if live.is_empty() {
                    return Ok(None);
                }
                sync.fold(&live, |member, previous| match previous {
                    Some(previous) => {
                        let mut with_previous = args.to_vec();
                        with_previous.push(previous.clone());
                        member.invoke(this, &with_previous)
                    }
                    None => member.invoke(this, args),
                })
            }
        }
    }

    /// Returns a function that invokes this chain on `scope` with `args`
    /// prepended to whatever the function is called with.
    #[must_use]
    pub fn partial(&self, scope: Value, args: Vec<Value>) -> Func {
        let chain = self.clone();
        Func::new("partial", move |_, rest| {
            let mut all = args.clone();
            all.extend_from_slice(rest);
            let mut scope = scope.clone();
            chain.call(&mut scope, &all)
        })
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .zip(other.members.iter())
                .all(|(a, b)| a.callable.ptr_eq(&b.callable))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<chain {:?} ", self.strategy)?;
        f.debug_list().entries(self.members()).finish()?;
        write!(f, ">")
    }
}

/// Attaches `member` to the chain stored under `name`, turning an existing
/// function into a chain first.
///
/// # Errors
///
/// Returns a type mismatch if the property holds a value that is not callable;
/// the record is left untouched in that case.
pub fn on(
    record: &mut Record,
    name: &str,
    member: impl Into<Callable>,
    strategy: Strategy,
) -> Result<()> {
    let mut chain = Chain::coerce(record.get(name).cloned(), strategy)?;
    chain.add(member);
    record.insert(name, chain);
    Ok(())
}

/// Detaches `member` from the chain stored under `name`.
///
/// Returns true if the member was found and removed.
pub fn off(record: &mut Record, name: &str, member: &Callable) -> bool {
    match record.get_mut(name) {
        Some(Value::Chain(chain)) => chain.remove(member),
        _ => false,
    }
}
