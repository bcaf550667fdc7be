//! Native functions and the callable union used by chains.

use std::fmt;
use std::sync::Arc;

use crate::chain::Chain;
use crate::types::Type;
use crate::value::Value;
use crate::Result;

/// Signature of a native function body.
///
/// `this` is the receiver the function is invoked on; a function may change it.
/// Returning `Ok(None)` means the function produced no value.
pub type NativeBody = dyn Fn(&mut Value, &[Value]) -> Result<Option<Value>> + Send + Sync;

/// A named native function.
///
/// Cloning shares the body; two functions are equal only when they share it.
#[derive(Clone)]
pub struct Func {
    name: Arc<str>,
    arity: Option<usize>,
    body: Arc<NativeBody>,
}

impl Func {
    /// Creates a variadic function.
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(&mut Value, &[Value]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: None,
            body: Arc::new(body),
        }
    }

    /// Declares how many arguments this function takes.
    ///
    /// Asynchronous chains use the declared arity to tell whether a member
    /// accepts a continuation argument.
    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared arity, or `None` for variadic functions.
    #[must_use]
    pub const fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Invokes the function.
    ///
    /// # Errors
    ///
    /// Propagates whatever the function body returns.
    pub fn call(&self, this: &mut Value, args: &[Value]) -> Result<Option<Value>> {
        (self.body)(this, args)
    }

    /// Returns true if both functions share the same body.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Some(n) => write!(f, "<fn {}/{n}>", self.name),
            None => write!(f, "<fn {}>", self.name),
        }
    }
}

/// Anything that can be invoked: a plain function or a whole chain.
#[derive(Clone, PartialEq)]
pub enum Callable {
    /// A plain native function.
    Func(Func),
    /// A chain, invoked as a single function.
    Chain(Chain),
}

impl Callable {
    /// Invokes the callable.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by the function or chain members.
    pub fn call(&self, this: &mut Value, args: &[Value]) -> Result<Option<Value>> {
        match self {
            Self::Func(f) => f.call(this, args),
            Self::Chain(c) => c.call(this, args),
        }
    }

    /// Declared arity; chains are variadic.
    #[must_use]
    pub const fn arity(&self) -> Option<usize> {
        match self {
            Self::Func(f) => f.arity(),
            Self::Chain(_) => None,
        }
    }

    /// Returns true if both callables are the same function or share chain members.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Func(a), Self::Func(b)) => a.ptr_eq(b),
            (Self::Chain(a), Self::Chain(b)) => a == b,
            _ => false,
        }
    }

    /// Returns the type of the callable.
    #[must_use]
    pub const fn value_type(&self) -> Type {
        match self {
            Self::Func(_) => Type::Func,
            Self::Chain(_) => Type::Chain,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Func(func) => fmt::Debug::fmt(func, f),
            Self::Chain(chain) => fmt::Debug::fmt(chain, f),
        }
    }
}

impl From<Func> for Callable {
    fn from(f: Func) -> Self {
        Self::Func(f)
    }
}

impl From<Chain> for Callable {
    fn from(c: Chain) -> Self {
        Self::Chain(c)
    }
}

impl TryFrom<Value> for Callable {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Func(f) => Ok(Self::Func(f)),
            Value::Chain(c) => Ok(Self::Chain(c)),
            other => Err(crate::Error::type_mismatch(
                Type::Callable,
                other.value_type(),
            )),
        }
    }
}
