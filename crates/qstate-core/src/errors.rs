use thiserror::Error;

/// Result type alias using QStateError
pub type Result<T> = std::result::Result<T, QStateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registry/configuration
    UnknownType,
    DuplicateFieldName,
    UnknownField,
    InvalidInput,
    InvalidSchema,

    // Data shape (recovered locally, never returned from the codec)
    MalformedValue,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnknownType => "ERR_UNKNOWN_TYPE",
            ExErrorKind::DuplicateFieldName => "ERR_DUPLICATE_FIELD_NAME",
            ExErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::MalformedValue => "ERR_MALFORMED_VALUE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context
/// (operation, field, group) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    field: Option<String>,
    group: Option<String>,
    type_name: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            field: None,
            group: None,
            type_name: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add field name context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add group name context
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Add type name context
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(group) = &self.group {
            write!(f, " (group: {})", group)?;
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for qstate operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QStateError {
    /// A field references a type name that is not registered
    #[error("Unknown type '{type_name}' for field {field}")]
    UnknownType { type_name: String, field: String },

    /// Two field specs across the group set share a name
    #[error("Duplicate field name '{field}' in groups {first_group} and {second_group}")]
    DuplicateFieldName {
        field: String,
        first_group: String,
        second_group: String,
    },

    /// A value was passed to convert for a field no group declares
    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    /// Caller supplied an invalid argument
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Schema configuration failed validation
    #[error("Invalid schema: {reason}")]
    InvalidSchema { reason: String },

    /// Reading a schema file failed
    #[error("IO error: {message}")]
    Io { message: String },

    /// JSON/YAML encoding or decoding failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<QStateError> for ExError {
    fn from(err: QStateError) -> Self {
        match err {
            QStateError::UnknownType { type_name, field } => {
                ExError::new(ExErrorKind::UnknownType)
                    .with_type_name(type_name)
                    .with_field(field)
                    .with_message("Type is not registered")
            }

            QStateError::DuplicateFieldName {
                field,
                first_group,
                second_group,
            } => ExError::new(ExErrorKind::DuplicateFieldName)
                .with_field(field)
                .with_group(second_group)
                .with_message(format!("Field already declared by group {}", first_group)),

            QStateError::UnknownField { field } => ExError::new(ExErrorKind::UnknownField)
                .with_field(field)
                .with_message("No group declares this field"),

            QStateError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            QStateError::InvalidSchema { reason } => ExError::new(ExErrorKind::InvalidSchema)
                .with_op("schema_parse")
                .with_message(reason),

            QStateError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),

            QStateError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<std::io::Error> for QStateError {
    fn from(err: std::io::Error) -> Self {
        QStateError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for QStateError {
    fn from(err: serde_json::Error) -> Self {
        QStateError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for QStateError {
    fn from(err: serde_yaml::Error) -> Self {
        QStateError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QStateError::UnknownType {
            type_name: "Money".to_string(),
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown type 'Money' for field price");
    }

    #[test]
    fn test_ex_error_display_includes_context() {
        let err = ExError::new(ExErrorKind::UnknownField)
            .with_op("convert")
            .with_field("ghost")
            .with_message("No group declares this field");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_UNKNOWN_FIELD]"));
        assert!(text.contains("in operation 'convert'"));
        assert!(text.contains("(field: ghost)"));
    }

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::UnknownType,
            ExErrorKind::DuplicateFieldName,
            ExErrorKind::UnknownField,
            ExErrorKind::InvalidInput,
            ExErrorKind::InvalidSchema,
            ExErrorKind::MalformedValue,
            ExErrorKind::Io,
            ExErrorKind::Serialization,
            ExErrorKind::Internal,
        ];
        let codes: std::collections::BTreeSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: QStateError = io.into();
        assert!(matches!(err, QStateError::Io { .. }));
    }
}
