//! Registry Extension Tests
//!
//! This test suite verifies custom types and per-session extension.
//!
//! ## Scenarios Covered
//!
//! 1. A custom type registered before init is usable by fields
//! 2. Overriding a builtin replaces it for that session only
//! 3. Session::extend applies to later calls and re-merges defaults
//! 4. Unknown types fail fast at init
//! 5. Extension types carry free-form options

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::Fixture;
use qstate_core::types::FnHandler;
use qstate_core::{
    Environment, Group, MemoryHistory, Options, QStateError, Session, SessionConfig, TypeDef,
    TypeOptions, TypeRegistry, Value,
};
use serde_json::json;

/// `Cents`: "12.34" <-> Int(1234)
fn cents() -> TypeDef {
    TypeDef::new(
        FnHandler::new(
            |raw: Option<&str>, fallback: &Value, _: &TypeOptions| {
                raw.and_then(|s| s.parse::<f64>().ok())
                    .map_or_else(|| fallback.clone(), |n| Value::Int((n * 100.0).round() as i64))
            },
            |value: &Value, _: &TypeOptions| {
                value
                    .as_int()
                    .map(|n| format!("{}.{:02}", n / 100, n.rem_euclid(100)))
            },
        ),
        TypeOptions::new(),
    )
}

/// `Tagged`: prefixes values with the `prefix` option
fn tagged() -> TypeDef {
    TypeDef::new(
        FnHandler::new(
            |raw: Option<&str>, fallback: &Value, options: &TypeOptions| {
                let prefix = options
                    .extra
                    .get("prefix")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                match raw {
                    Some(s) if !s.is_empty() => {
                        Value::Str(s.strip_prefix(prefix).unwrap_or(s).to_string())
                    }
                    _ => fallback.clone(),
                }
            },
            |value: &Value, options: &TypeOptions| {
                let prefix = options
                    .extra
                    .get("prefix")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                value.as_str().map(|s| format!("{}{}", prefix, s))
            },
        ),
        TypeOptions::new().with_extra("prefix", json!("id-")),
    )
}

#[test]
fn test_custom_type_registered_before_init() {
    let mut registry = TypeRegistry::with_builtins();
    registry.extend([("Cents", cents())]).unwrap();

    let history = Arc::new(MemoryHistory::standalone("price=12.5"));
    let session = Session::init(
        vec![Group::silent("cart").field("price", "Cents", 0i64)],
        Environment::memory(&history),
        SessionConfig::new().with_registry(registry),
    )
    .unwrap();

    let records = session.load().unwrap();
    assert_eq!(records[0]["price"], Value::Int(1250));

    let out = session.convert(records, true).unwrap();
    assert_eq!(out[0].get("price").map(String::as_str), Some("12.50"));
}

#[test]
fn test_unknown_type_fails_at_init() {
    let history = Arc::new(MemoryHistory::standalone(""));
    let err = Session::init(
        vec![Group::silent("cart").field("price", "Cents", 0i64)],
        Environment::memory(&history),
        SessionConfig::new(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        QStateError::UnknownType {
            type_name: "Cents".into(),
            field: "price".into(),
        }
    );
}

#[test]
fn test_duplicate_field_fails_at_init() {
    let history = Arc::new(MemoryHistory::standalone(""));
    let err = Session::init(
        vec![
            Group::silent("a").field("page", "Int", 1i64),
            Group::silent("b").field("page", "Int", 1i64),
        ],
        Environment::memory(&history),
        SessionConfig::new(),
    )
    .unwrap_err();
    assert!(matches!(err, QStateError::DuplicateFieldName { .. }));
}

#[test]
fn test_session_extend_overrides_builtin_for_that_session_only() {
    let shouting = TypeDef::new(
        FnHandler::new(
            |raw: Option<&str>, fallback: &Value, _: &TypeOptions| match raw {
                Some(s) if !s.is_empty() => Value::Str(s.to_uppercase()),
                _ => fallback.clone(),
            },
            |value: &Value, _: &TypeOptions| value.as_str().map(str::to_lowercase),
        ),
        TypeOptions::new(),
    );

    let first = Fixture::new("q=shoes");
    let second = Fixture::new("q=shoes");

    first.session.extend([("String", shouting)]).unwrap();

    assert_eq!(first.session.load().unwrap()[1]["q"], Value::Str("SHOES".into()));
    assert_eq!(second.session.load().unwrap()[1]["q"], Value::Str("shoes".into()));
}

#[test]
fn test_session_extend_merges_new_defaults_under_overrides() {
    let fx = Fixture::with_config(
        "",
        SessionConfig::new().with_options(
            Options::new().with("Tagged", TypeOptions::new().with_extra("prefix", json!("user-"))),
        ),
    );
    fx.session.extend([("Tagged", tagged())]).unwrap();

    let options = fx.session.options();
    assert_eq!(options.get("Tagged").unwrap().extra["prefix"], json!("user-"));
}

#[test]
fn test_extension_type_reads_extra_options() {
    let mut registry = TypeRegistry::with_builtins();
    registry.extend([("Tagged", tagged())]).unwrap();

    let history = Arc::new(MemoryHistory::standalone("owner=id-42"));
    let session = Session::init(
        vec![Group::silent("filter").field("owner", "Tagged", Value::Null)],
        Environment::memory(&history),
        SessionConfig::new().with_registry(registry),
    )
    .unwrap();

    let records = session.load().unwrap();
    assert_eq!(records[0]["owner"], Value::Str("42".into()));
    let out = session.convert(records, true).unwrap();
    assert_eq!(out[0].get("owner").map(String::as_str), Some("id-42"));
}

#[test]
fn test_extend_rejects_empty_name_atomically() {
    let fx = Fixture::new("");
    let err = fx
        .session
        .extend([("Cents", cents()), ("", cents())])
        .unwrap_err();
    assert!(matches!(err, QStateError::InvalidInput { .. }));
    assert!(fx.session.options().get("Cents").is_none());
}
