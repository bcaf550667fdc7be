//! Core values, records, function chains, and errors for Overlay.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value type merged and composed by the engine
//! - [`Record`] and [`List`] - Persistent collections with structural sharing
//! - [`Func`] and [`Callable`] - Native functions
//! - [`Chain`] and [`Strategy`] - Invocable function lists
//! - [`Error`] - Rich error types with context
//! - [`LogSink`] - Where recovered faults are reported

#![recursion_limit = "512"]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chain;
pub mod collections;
pub mod error;
pub mod func;
pub mod sink;
pub mod types;
pub mod value;

pub use chain::{Chain, CustomStrategy, Strategy};
pub use collections::{List, Record};
pub use error::{Error, ErrorContext, ErrorKind};
pub use func::{Callable, Func};
pub use sink::{LogEntry, LogSink, MemorySink, NullSink, TracingSink};
pub use types::Type;
pub use value::Value;

/// Result type alias using the Overlay error type.
pub type Result<T> = std::result::Result<T, Error>;
