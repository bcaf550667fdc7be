//! Integration tests for merge behaviour

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use overlay::merge;
use overlay_foundation::{Callable, Func, LogEntry, MemorySink, Record, Strategy, Value};
use overlay_rules::{MergeConfig, Merger, RuleMap, catalog};

// =============================================================================
// Basic Merges
// =============================================================================

#[test]
fn merge_without_rules_copies_properties() {
    let source = Record::new()
        .with("a", 1)
        .with("b", Record::new().with("c", "x"));
    let mut target = Record::new();
    merge(&mut target, &source, RuleMap::new());
    assert_eq!(target, source);
}

#[test]
fn deep_replace_merges_nested_records() {
    let mut target = Record::new().with("a", Record::new().with("x", 1));
    let source = Record::new().with("a", Record::new().with("y", 2));
    merge(&mut target, &source, catalog::deep_replace());

    assert_eq!(
        target,
        Record::new().with("a", Record::new().with("x", 1).with("y", 2))
    );
}

#[test]
fn successive_replace_merges_last_writer_wins() {
    let a = Record::new().with("x", 1).with("y", 1);
    let b = Record::new().with("y", 2).with("z", 2);
    let mut target = Record::new();
    merge(&mut target, &a, catalog::replace());
    merge(&mut target, &b, catalog::replace());

    assert_eq!(target, Record::new().with("x", 1).with("y", 2).with("z", 2));
}

#[test]
fn merging_never_changes_the_source() {
    let source = Record::new().with("a", Record::new().with("x", 1));
    let snapshot = source.clone();
    let mut target = Record::new();
    merge(&mut target, &source, catalog::deep_replace());

    target
        .get_mut("a")
        .and_then(Value::as_record_mut)
        .unwrap()
        .insert("x", 99);
    assert_eq!(source, snapshot);
}

// =============================================================================
// Chains Through Merge
// =============================================================================

#[test]
fn chain_append_across_merges_keeps_order_and_stops_at_defined() {
    let b_calls = Arc::new(AtomicUsize::new(0));
    let f_a = Func::new("f_a", |_, _| Ok(Some(Value::Int(1))));
    let f_b = {
        let b_calls = Arc::clone(&b_calls);
        Func::new("f_b", move |_, _| {
            b_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Value::Int(2)))
        })
    };
    let merger = Merger::new().with_config(MergeConfig::default().with_chain_strategy(Strategy::StopAtDefined));
    let rules = RuleMap::single(catalog::chain_append());

    let mut target = Record::new();
    merger.merge(&mut target, &Record::new().with("run", f_a.clone()), &rules);
    merger.merge(&mut target, &Record::new().with("run", f_b.clone()), &rules);

    let chain = target.get("run").and_then(Value::as_chain).unwrap();
    let members: Vec<_> = chain.members().cloned().collect();
    assert_eq!(members, vec![Callable::from(f_a), Callable::from(f_b)]);

    let mut this = Value::Null;
    assert_eq!(chain.call(&mut this, &[]).unwrap(), Some(Value::Int(1)));
    assert_eq!(b_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn chain_rule_factory_fixes_strategy() {
    let rules = RuleMap::single(catalog::chain_rule(Strategy::All, catalog::Position::Prepend));
    let mut target = Record::new().with("check", Func::new("second", |_, _| Ok(Some(Value::Bool(true)))));
    merge(
        &mut target,
        &Record::new().with("check", Func::new("first", |_, _| Ok(Some(Value::Bool(false))))),
        rules,
    );

    let chain = target.get("check").and_then(Value::as_chain).unwrap();
    assert_eq!(chain.strategy(), &Strategy::All);
    let names: Vec<String> = chain
        .members()
        .map(|m| format!("{m:?}"))
        .collect();
    assert_eq!(names, vec!["<fn first>", "<fn second>"]);
}

// =============================================================================
// Fault Containment
// =============================================================================

#[test]
fn faults_are_logged_with_dumps() {
    let sink = Arc::new(MemorySink::new());
    let merger = Merger::new().with_sink(sink.clone());
    let mut target = Record::new().with("a", 1);
    let source = Record::new().with("a", 2);

    merger.merge(&mut target, &source, &RuleMap::new());

    let entries = sink.entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0], LogEntry::Message("merge: \"a\" no override specified".to_string()));
    assert_eq!(
        entries[2],
        LogEntry::Dump {
            label: "source".to_string(),
            value: Value::Record(source),
        }
    );
    assert_eq!(target.get("a"), Some(&Value::Int(1)));
}

#[test]
fn nested_faults_stay_inside_the_nested_merge() {
    let sink = Arc::new(MemorySink::new());
    let merger = Merger::new().with_sink(sink.clone());
    let mut target = Record::new().with("opts", Record::new().with("a", 1));
    let source = Record::new().with("opts", Record::new().with("a", 2).with("b", 3));
    let rules = RuleMap::new().with("opts", catalog::extend());

    merger.merge(&mut target, &source, &rules);

    let opts = target.get("opts").and_then(Value::as_record).unwrap();
    assert_eq!(opts, &Record::new().with("a", 1).with("b", 3));
    assert_eq!(sink.messages(), vec!["merge: \"a\" no override specified"]);
}

// =============================================================================
// Properties
// =============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;
    use proptest::strategy::Strategy as _;

    fn flat() -> impl proptest::strategy::Strategy<Value = Record> {
        prop::collection::btree_map("[a-f]", any::<i32>(), 0..6)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn deep_rules_match_shallow_rules_on_flat_records(a in flat(), b in flat()) {
            let mut deep = a.clone();
            let mut shallow = a.clone();
            merge(&mut deep, &b, catalog::deep_replace());
            merge(&mut shallow, &b, catalog::replace());
            prop_assert_eq!(deep, shallow);

            let mut deep = a.clone();
            let mut shallow = a;
            merge(&mut deep, &b, catalog::deep_fill());
            merge(&mut shallow, &b, catalog::fill());
            prop_assert_eq!(deep, shallow);
        }

        #[test]
        fn ignore_never_writes(a in flat(), b in flat()) {
            let mut target = a.clone();
            merge(&mut target, &b, catalog::ignore());
            prop_assert_eq!(target, a);
        }
    }
}
