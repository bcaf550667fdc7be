//! Integration tests for Value types
//!
//! Tests truthiness, equality, conversions, and record behaviour.

use overlay_foundation::{Callable, Chain, Func, List, Record, Strategy, Type, Value};

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn falsy_values() {
    for value in [
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Float(0.0),
        Value::Float(f64::NAN),
        Value::from(""),
    ] {
        assert!(!value.is_truthy(), "{value:?} should be falsy");
    }
}

#[test]
fn truthy_values() {
    for value in [
        Value::Bool(true),
        Value::Int(-1),
        Value::Float(0.5),
        Value::from("x"),
        Value::List(List::new()),
        Value::Record(Record::new()),
    ] {
        assert!(value.is_truthy(), "{value:?} should be truthy");
    }
}

// =============================================================================
// Equality and Types
// =============================================================================

#[test]
fn null_is_not_absence() {
    let record = Record::new().with("a", Value::Null);
    assert_eq!(record.get("a"), Some(&Value::Null));
    assert_eq!(record.get("b"), None);
}

#[test]
fn functions_compare_by_identity() {
    let f = Func::new("f", |_, _| Ok(None));
    let same_body = Func::new("f", |_, _| Ok(None));
    assert_eq!(Value::Func(f.clone()), Value::Func(f.clone()));
    assert_ne!(Value::Func(f), Value::Func(same_body));
}

#[test]
fn value_types() {
    assert_eq!(Value::Int(1).value_type(), Type::Int);
    assert_eq!(Value::from("s").value_type(), Type::String);
    assert_eq!(Value::from(Chain::new(Strategy::LastDefined)).value_type(), Type::Chain);
    assert!(Value::from(Chain::new(Strategy::LastDefined)).value_type().is_callable());
    assert!(!Type::Int.is_callable());
}

#[test]
fn callable_conversion() {
    let f = Func::new("f", |_, _| Ok(Some(Value::Int(1))));
    let callable = Callable::try_from(Value::Func(f.clone())).unwrap();
    assert_eq!(callable, Callable::Func(f));
    assert!(Callable::try_from(Value::Int(1)).is_err());
}

#[test]
fn calling_a_non_callable_fails() {
    let mut this = Value::Null;
    let err = Value::Int(3).call(&mut this, &[]).unwrap_err();
    assert!(format!("{err}").contains("not callable"));
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn records_iterate_in_name_order() {
    let record = Record::new().with("b", 2).with("c", 3).with("a", 1);
    let names: Vec<&str> = record.keys().map(|k| k.as_ref()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn records_are_values() {
    let original = Record::new().with("a", 1);
    let mut copy = original.clone();
    copy.insert("a", 2);
    assert_eq!(original.get("a"), Some(&Value::Int(1)));
    assert_eq!(copy.get("a"), Some(&Value::Int(2)));
}

#[test]
fn list_concat() {
    let a: List = vec![1, 2].into_iter().collect();
    let b: List = vec![3].into_iter().collect();
    let joined = a.concat(&b);
    assert_eq!(joined.len(), 3);
    assert_eq!(joined.get(2), Some(&Value::Int(3)));
    assert_eq!(a.len(), 2);
}
