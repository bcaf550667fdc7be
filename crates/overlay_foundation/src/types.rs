//! Type descriptors for runtime checks on dynamic values.

use std::fmt;

/// Type descriptor for a [`Value`](crate::Value).
///
/// Used by rules to validate operands and to report mismatches.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// The explicit null type.
    Null,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Persistent list.
    List,
    /// Persistent record (property map).
    Record,
    /// Plain native function.
    Func,
    /// Function chain.
    Chain,
    /// Anything invocable (a function or a chain).
    Callable,
}

impl Type {
    /// Returns true if values of this type can be invoked.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Func | Self::Chain | Self::Callable)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Record => "record",
            Self::Func => "fn",
            Self::Chain => "chain",
            Self::Callable => "callable",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
