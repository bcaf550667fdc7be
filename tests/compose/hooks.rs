//! Integration tests for lifecycle hooks

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use overlay::{Definition, Error, Record, RuleMap, Value, catalog, create};

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Log, entry: String) {
    log.lock().unwrap().push(entry);
}

// =============================================================================
// Base
// =============================================================================

#[test]
fn base_factory_receives_primary() {
    let base = Definition::named("base")
        .with_base(|primary| Ok(Record::new().with("built_for", primary.name())))
        .with("from_base", 1)
        .shared();
    let root = Definition::named("root").implementing(&base).shared();

    let composed = create(&[], &root).unwrap();
    assert_eq!(composed.get("built_for"), Some(&Value::from("root")));
    assert_eq!(composed.get("from_base"), Some(&Value::Int(1)));
}

#[test]
fn base_factory_errors_propagate() {
    let root = Definition::named("root")
        .with_base(|_| Err(Error::rule_fault("no base")))
        .shared();

    let err = create(&[], &root).unwrap_err();
    assert_eq!(err.context.unwrap().stack, vec!["base hook of root"]);
}

// =============================================================================
// Make and Built
// =============================================================================

#[test]
fn make_runs_after_each_merge_and_built_after_traversal() {
    let log = log();
    let hooked = |name: &'static str| {
        let make_log = Arc::clone(&log);
        let built_log = Arc::clone(&log);
        Definition::named(name)
            .with(name, true)
            .with_make(move |output, primary, node| {
                push(
                    &make_log,
                    format!("make {} for {} with {} props", node.name(), primary.name(), output.len()),
                );
                Ok(())
            })
            .with_built(move |output, primary| {
                push(&built_log, format!("built {name} for {} with {} props", primary.name(), output.len()));
                Ok(())
            })
    };
    let base = hooked("base").shared();
    let root = hooked("root").implementing(&base).shared();

    create(&[], &root).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "make base for root with 1 props",
            "make root for root with 2 props",
            "built base for root with 2 props",
            "built root for root with 2 props",
        ]
    );
}

#[test]
fn make_can_add_properties() {
    let root = Definition::named("root")
        .with("n", 2)
        .with_make(|output, _, _| {
            let doubled = output.get("n").and_then(Value::as_int).unwrap_or(0) * 2;
            output.insert("doubled", doubled);
            Ok(())
        })
        .shared();

    let composed = create(&[], &root).unwrap();
    assert_eq!(composed.get("doubled"), Some(&Value::Int(4)));
}

#[test]
fn hooks_can_compose_recursively() {
    let part = Definition::named("part").with("size", 1).shared();
    let whole = {
        let part = Arc::clone(&part);
        Definition::named("whole")
            .with_make(move |output, _, _| {
                let inner = create(&[], &part)?;
                output.insert("part", inner.into_record());
                Ok(())
            })
            .shared()
    };

    let composed = create(&[], &whole).unwrap();
    assert_eq!(
        composed.get("part"),
        Some(&Value::from(Record::new().with("size", 1)))
    );
}

#[test]
fn make_errors_name_the_definition() {
    let base = Definition::named("base")
        .with_make(|_, _, _| Err(Error::rule_fault("broken")))
        .shared();
    let root = Definition::named("root").implementing(&base).shared();

    let err = create(&[], &root).unwrap_err();
    assert!(format!("{err}").contains("broken"));
    assert_eq!(err.context.unwrap().stack, vec!["make hook of base"]);
}

// =============================================================================
// Integrate
// =============================================================================

#[test]
fn integrate_runs_for_later_nodes_only() {
    let seen = log();
    let base = {
        let seen = Arc::clone(&seen);
        Definition::named("base")
            .with_integrate(move |_, node, primary| {
                push(&seen, format!("{} of {}", node.name(), primary.name()));
                Ok(None)
            })
            .shared()
    };
    let mid = Definition::named("mid").implementing(&base).shared();
    let root = Definition::named("root").implementing(&mid).shared();

    create(&[], &root).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["mid of root", "root of root"]);
}

#[test]
fn integrate_overrides_rules_for_one_node() {
    let base = Definition::named("base")
        .with("secret", "kept")
        .with_integrate(|_, node, _| {
            Ok(node
                .get("secret")
                .map(|_| RuleMap::new().with("secret", catalog::ignore())))
        })
        .shared();
    let child = Definition::named("child")
        .with("secret", "leaked")
        .with("visible", 1)
        .implementing(&base)
        .shared();

    let composed = create(&[], &child).unwrap();
    assert_eq!(composed.get("secret"), Some(&Value::from("kept")));
    assert_eq!(composed.get("visible"), Some(&Value::Int(1)));
    assert_eq!(child.get("secret"), Some(&Value::from("leaked")));
}

#[test]
fn integrate_overrides_do_not_persist() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = {
        let calls = Arc::clone(&calls);
        Definition::named("base")
            .with_rules(catalog::replace())
            .with_integrate(move |_, node, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok((node.name() == "mid").then(|| RuleMap::single(catalog::ignore())))
            })
            .shared()
    };
    let mid = Definition::named("mid").with("x", "mid").implementing(&base).shared();
    let root = Definition::named("root").with("x", "root").implementing(&mid).shared();

    let composed = create(&[], &root).unwrap();
    assert_eq!(composed.get("x"), Some(&Value::from("root")));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn integrate_errors_propagate() {
    let base = Definition::named("base")
        .with_integrate(|_, _, _| Err(Error::usage("refused")))
        .shared();
    let root = Definition::named("root").implementing(&base).shared();

    let err = create(&[], &root).unwrap_err();
    assert!(err.is_usage());
    assert_eq!(err.context.unwrap().stack, vec!["integrate hook of base"]);
}
