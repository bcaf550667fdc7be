//! Integration tests for Layer 1: Rules
//!
//! Tests for the merge engine, rule-map scoping, the rule catalog, and
//! property markers.

#![recursion_limit = "512"]

mod merge;
