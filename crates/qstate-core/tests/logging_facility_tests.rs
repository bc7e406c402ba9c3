#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::Fixture;
use qstate_core::errors::QStateError;
use qstate_core::logging_facility::test_capture::init_test_capture;
use qstate_core::{log_op_end, log_op_error, log_op_start, TypedRecord, Value};
use qstate_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_FALLBACK, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1, "Should have exactly one start event");
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name, None);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = QStateError::UnknownField {
        field: "ghost".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events_for_op(op_name, None);
    assert_eq!(events[0].field("err_code"), Some("ERR_UNKNOWN_FIELD"));
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, group = "pager", field = "page");

    let events = capture.events_for_op(op_name, None);
    assert_eq!(events[0].field("group"), Some("pager"));
    assert_eq!(events[0].field("field"), Some("page"));
}

#[test]
fn test_session_lifecycle_events_carry_session_id() {
    let capture = init_test_capture();
    let fx = Fixture::new("page=1");
    let session_id = fx.session.id().to_string();

    fx.session.load().unwrap();
    fx.history.push_state("page=2");
    fx.session.destroy();

    for op in [
        "session_init",
        "session_load",
        "session_notify",
        "session_destroy",
    ] {
        let events = capture.events_for_op(op, Some(&session_id));
        let starts = events
            .iter()
            .filter(|e| e.event.as_deref() == Some(EVENT_START))
            .count();
        let ends = events
            .iter()
            .filter(|e| e.event.as_deref() == Some(EVENT_END))
            .count();
        assert_eq!((starts, ends), (1, 1), "boundary events for {}", op);
    }

    let notify_end = capture
        .events_for_op("session_notify", Some(&session_id))
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(notify_end.field("changed_count"), Some("1"));
    assert_eq!(notify_end.field("fired_count"), Some("1"));
}

#[test]
fn test_convert_error_is_logged() {
    let capture = init_test_capture();
    let fx = Fixture::new("");
    let session_id = fx.session.id().to_string();

    let record: TypedRecord = [("nope".to_string(), Value::Int(1))].into_iter().collect();
    assert!(fx.session.convert(vec![record], false).is_err());

    let errors: Vec<_> = capture
        .events_for_op("session_convert", Some(&session_id))
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err_code"), Some("ERR_UNKNOWN_FIELD"));
}

#[test]
fn test_parse_fallback_names_the_field() {
    let capture = init_test_capture();
    let fx = Fixture::new("size=not-a-number-unique");

    let records = fx.session.load().unwrap();
    assert_eq!(records[0]["size"], Value::Int(20));

    let fallbacks: Vec<_> = capture
        .fallbacks_for_field("size")
        .into_iter()
        .filter(|e| e.field("raw") == Some("not-a-number-unique"))
        .collect();
    assert!(!fallbacks.is_empty());
    assert_eq!(fallbacks[0].event.as_deref(), Some(EVENT_FALLBACK));
    assert_eq!(fallbacks[0].field("err_code"), Some("ERR_MALFORMED_VALUE"));
    assert_eq!(fallbacks[0].field("group"), Some("pager"));
}
