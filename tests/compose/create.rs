//! Integration tests for create

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use overlay::{Chain, Definition, DefinitionRef, Func, Implementor, Record, RuleMap, Strategy, Value, catalog, create};

fn counted(name: &str, counter: &Arc<AtomicUsize>) -> Definition {
    let counter = Arc::clone(counter);
    Definition::named(name).with_make(move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

fn diamond(base: &DefinitionRef) -> DefinitionRef {
    let left = Definition::named("left").with("left", true).implementing(base).shared();
    let right = Definition::named("right").with("right", true).implementing(base).shared();
    Definition::named("root")
        .implementing(&left)
        .implementing(&right)
        .shared()
}

// =============================================================================
// Diamond Handling
// =============================================================================

#[test]
fn shared_ancestor_applies_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = counted("base", &calls).with("shared", 1).shared();

    let composed = create(&[], &diamond(&base)).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        composed.record(),
        &Record::new().with("left", true).with("right", true).with("shared", 1)
    );
}

#[test]
fn reinherit_applies_each_time_reached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = counted("base", &calls)
        .with("shared", 1)
        .with_rules(catalog::replace())
        .reinherit()
        .shared();

    create(&[], &diamond(&base)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn separate_creates_do_not_share_state() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = counted("base", &calls).shared();
    let root = diamond(&base);

    create(&[], &root).unwrap();
    create(&[], &root).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn outputs_own_their_run_once_members() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = {
        let calls = Arc::clone(&calls);
        Func::new("count", move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        })
    };
    let mut init = Chain::new(Strategy::LastDefined);
    init.add_once(counter);
    let def = Definition::named("widget").with("init", init).shared();

    let first = create(&[], &def).unwrap();
    let second = create(&[], &def).unwrap();
    let fire = |value: Option<&Value>| value.unwrap().call(&mut Value::Null, &[]).unwrap();

    fire(first.get("init"));
    fire(first.get("init"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    fire(second.get("init"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The definition's own chain is still unspent.
    fire(def.get("init"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let third = create(&[], &def).unwrap();
    fire(third.get("init"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Composed Objects
// =============================================================================

#[test]
fn composed_object_as_target_is_rejected() {
    let def = Definition::named("d").with("a", 1).shared();
    let composed = create(&[], &def).unwrap();

    let err = create(&[], &composed).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn composed_object_as_implementor_stands_for_its_origin() {
    let origin = Definition::named("origin").with("o", 1).shared();
    let target = Definition::named("target").with("t", 2).shared();
    let composed = create(&[], &origin).unwrap();

    let via_composed = create(&[Implementor::from(&composed)], &target).unwrap();
    let via_definition = create(&[Implementor::from(&origin)], &target).unwrap();

    assert_eq!(via_composed.record(), via_definition.record());
    assert_eq!(via_composed.get("o"), Some(&Value::Int(1)));
}

#[test]
fn creation_implementors_leave_target_untouched() {
    let extra = Definition::named("extra").with("e", 1).shared();
    let target = Definition::named("target").with("t", 2).shared();

    let with_extra = create(&[Implementor::from(&extra)], &target).unwrap();
    let plain = create(&[], &target).unwrap();

    assert_eq!(with_extra.get("e"), Some(&Value::Int(1)));
    assert_eq!(plain.get("e"), None);
    assert_eq!(target.implement().count(), 0);
}

#[test]
fn lineage_is_not_a_property() {
    let def = Definition::named("d").with("a", 1).shared();
    let composed = create(&[], &def).unwrap();
    assert_eq!(composed.record().len(), 1);
    assert!(Arc::ptr_eq(composed.definition(), &def));
}

// =============================================================================
// Rule Accumulation
// =============================================================================

#[test]
fn own_rules_govern_later_nodes_only() {
    // first declares REPLACE, yet its own property is merged under DEFINE:
    // the value base already provided conflicts and first's is dropped.
    let base = Definition::named("base").with("x", "base").shared();
    let first = Definition::named("first")
        .with("x", "first")
        .with_rules(catalog::replace())
        .implementing(&base)
        .shared();
    let second = Definition::named("second")
        .with("x", "second")
        .implementing(&first)
        .shared();

    let only_first = create(&[], &first).unwrap();
    assert_eq!(only_first.get("x"), Some(&Value::from("base")));

    let both = create(&[], &second).unwrap();
    assert_eq!(both.get("x"), Some(&Value::from("second")));
}

#[test]
fn later_rules_replace_earlier_ones_per_path() {
    let a = Definition::named("a")
        .with("n", 1)
        .with_rules(RuleMap::single(catalog::replace()))
        .shared();
    let b = Definition::named("b")
        .with("n", 2)
        .with_rules(RuleMap::new().with("n", catalog::fill()))
        .implementing(&a)
        .shared();
    let c = Definition::named("c").with("n", 3).with("m", 3).implementing(&b).shared();

    let composed = create(&[], &c).unwrap();
    // b replaces under a's rules; c fills n under b's rule and replaces m.
    assert_eq!(composed.get("n"), Some(&Value::Int(2)));
    assert_eq!(composed.get("m"), Some(&Value::Int(3)));
}

#[test]
fn marked_properties_append() {
    let a = Definition::named("a").with("classes", vec![Value::from("base")]).shared();
    let b = Definition::named("b")
        .with("classes__", vec![Value::from("b")])
        .implementing(&a)
        .shared();
    let c = Definition::named("c")
        .with("__classes", vec![Value::from("c")])
        .implementing(&b)
        .shared();

    let composed = create(&[], &c).unwrap();
    assert_eq!(
        composed.get("classes"),
        Some(&Value::from(vec![Value::from("c"), Value::from("base"), Value::from("b")]))
    );
}
