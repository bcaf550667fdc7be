//! Integration tests for Layer 2: Compose
//!
//! Tests for definition composition: traversal, diamond handling, lifecycle
//! hooks, rule accumulation, and inherits.

#![recursion_limit = "512"]

mod create;
mod hooks;
