//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Record, Func, Chain strategies, and Error.

#![recursion_limit = "512"]

mod errors;
mod values;
