//! Integration tests for error types

use overlay_foundation::{Error, ErrorContext, ErrorKind, Type};

#[test]
fn conflict_message() {
    let err = Error::rule_conflict();
    assert!(err.is_conflict());
    assert_eq!(format!("{err}"), "no override specified");
}

#[test]
fn usage_error() {
    let err = Error::usage("bad call");
    assert!(err.is_usage());
    assert!(matches!(err.kind, ErrorKind::Usage(ref m) if m == "bad call"));
}

#[test]
fn frames_accumulate() {
    let err = Error::type_mismatch(Type::Record, Type::Int)
        .with_frame("make hook of a")
        .with_frame("create");
    let context = err.context.unwrap();
    assert_eq!(context.stack, vec!["make hook of a", "create"]);
}

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_property("title")
        .with_definition("Widget");
    let text = format!("{context}");
    assert!(text.contains("\"title\""));
    assert!(text.contains("Widget"));
}
