use qstate_core::errors::{ExError, ExErrorKind, QStateError};

#[test]
fn test_unknown_type_verifiable_by_kind() {
    let err = QStateError::UnknownType {
        type_name: "Money".to_string(),
        field: "price".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnknownType);
    assert_eq!(ex_err.code(), "ERR_UNKNOWN_TYPE");
    assert_eq!(ex_err.type_name(), Some("Money"));
    assert_eq!(ex_err.field(), Some("price"));
}

#[test]
fn test_duplicate_field_names_both_groups() {
    let err = QStateError::DuplicateFieldName {
        field: "page".to_string(),
        first_group: "pager".to_string(),
        second_group: "filter".to_string(),
    };
    assert!(err.to_string().contains("pager"));
    assert!(err.to_string().contains("filter"));

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateFieldName);
    assert_eq!(ex_err.field(), Some("page"));
    assert_eq!(ex_err.group(), Some("filter"));
    assert!(ex_err.message().contains("pager"));
}

#[test]
fn test_unknown_field_distinct_from_unknown_type() {
    let ex_err: ExError = QStateError::UnknownField {
        field: "sort".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnknownField);
    assert_ne!(ex_err.kind(), ExErrorKind::UnknownType);
    assert_eq!(ex_err.field(), Some("sort"));
}

#[test]
fn test_invalid_schema_carries_reason() {
    let ex_err: ExError = QStateError::InvalidSchema {
        reason: "schema declares no groups".to_string(),
    }
    .into();

    assert_eq!(ex_err.code(), "ERR_INVALID_SCHEMA");
    assert!(ex_err.message().contains("no groups"));
}

#[test]
fn test_yaml_error_converts_to_serialization() {
    let yaml_err = serde_yaml::from_str::<Vec<String>>("[").unwrap_err();
    let err: QStateError = yaml_err.into();
    assert!(matches!(err, QStateError::Serialization { .. }));
}

#[test]
fn test_builder_fields() {
    let ex_err = ExError::new(ExErrorKind::MalformedValue)
        .with_op("session_load")
        .with_field("page")
        .with_group("pager")
        .with_type_name("Int")
        .with_message("not a number");

    assert_eq!(ex_err.op(), Some("session_load"));
    assert_eq!(ex_err.code(), "ERR_MALFORMED_VALUE");
    assert!(ex_err.to_string().contains("not a number"));
}

#[test]
fn test_error_kind_code_mapping() {
    // Each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::UnknownType, "ERR_UNKNOWN_TYPE"),
        (ExErrorKind::DuplicateFieldName, "ERR_DUPLICATE_FIELD_NAME"),
        (ExErrorKind::UnknownField, "ERR_UNKNOWN_FIELD"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidSchema, "ERR_INVALID_SCHEMA"),
        (ExErrorKind::MalformedValue, "ERR_MALFORMED_VALUE"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
