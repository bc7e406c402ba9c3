//! Event macros
//!
//! Every event carries `component` (the calling module) and `event` from
//! `qstate_core_types::schema`. Extra `key = value` fields are passed
//! straight to `tracing`.

/// Operation entered
///
/// ```
/// # use qstate_core::log_op_start;
/// log_op_start!("session_load");
/// log_op_start!("session_load", group_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::qstate_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Operation finished
///
/// ```
/// # use qstate_core::log_op_end;
/// log_op_end!("session_load", duration_ms = 3);
/// log_op_end!("session_load", duration_ms = 3, record_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::qstate_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Operation failed
///
/// `$err` goes through [`ExError`](crate::errors::ExError), so the event
/// carries `err_kind` and the stable `err_code`.
///
/// ```
/// # use qstate_core::{log_op_error, errors::QStateError};
/// let err = QStateError::UnknownField { field: "ghost".to_string() };
/// log_op_error!("session_convert", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::qstate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        )
    }};
}

/// A parser ignored non-empty input and returned the field default
///
/// Emitted at debug level with `err_code = ERR_MALFORMED_VALUE`. When
/// called under the codec's `parse_field` span the event also picks up the
/// field and group names.
///
/// ```
/// # use qstate_core::log_fallback;
/// log_fallback!("Int", "abc");
/// ```
#[macro_export]
macro_rules! log_fallback {
    ($type_name:expr, $raw:expr) => {
        $crate::tracing::debug!(
            component = module_path!(),
            event = $crate::qstate_core_types::schema::EVENT_FALLBACK,
            type_name = $type_name,
            raw = $raw,
            err_code = $crate::errors::ExErrorKind::MalformedValue.code(),
        )
    };
}
