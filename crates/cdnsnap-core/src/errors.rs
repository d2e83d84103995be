use thiserror::Error;

/// Result type alias using DiffError
pub type Result<T> = std::result::Result<T, DiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// diagnostic sinks and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Comparison
    /// Two primitive values of different runtime types were compared
    TypeMismatch,

    // Snapshot decoding
    /// Snapshot bytes are not UTF-8 JSON, the root is not an object, or a
    /// section does not match the entity schema
    InvalidSnapshot,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, field) for operators reading the logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    field: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            field: None,
            message: String::new(),
        }
    }

    /// Set the operation name
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Set the field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Prepend `prefix: ` to the current message
    pub fn with_message_prefix(mut self, prefix: &str) -> Self {
        self.message = format!("{}: {}", prefix, self.message);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
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
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by the diff engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Two primitives of different runtime types cannot be ordered
    #[error("cannot compare a {left} with a {right}")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    /// Snapshot payload does not have the expected shape
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}

impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::TypeMismatch { left, right } => ExError::new(ExErrorKind::TypeMismatch)
                .with_op("compare_diffable")
                .with_message(format!("cannot compare a {} with a {}", left, right)),

            DiffError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(reason)
            }
        }
    }
}
