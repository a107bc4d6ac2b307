use thiserror::Error;

/// Result type alias using SchemaDiffError
pub type Result<T> = std::result::Result<T, SchemaDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// testing and CI gate output. Structural absence and reference cycles are
/// reported as data in the diff report and never surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// An element reference or scope passed to `compare` is empty
    InvalidInput,
    /// A schema document does not have the expected JSON shape
    InvalidDocument,
    /// A report could not be serialized
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the comparison context it was raised in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    element_ref: Option<String>,
    scope: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            element_ref: None,
            scope: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add element reference context
    pub fn with_element_ref(mut self, element_ref: impl Into<String>) -> Self {
        self.element_ref = Some(element_ref.into());
        self
    }

    /// Add scope context
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
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

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn element_ref(&self) -> Option<&str> {
        self.element_ref.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
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
        if let Some(element_ref) = &self.element_ref {
            write!(f, " (element_ref: {})", element_ref)?;
        }
        if let Some(scope) = &self.scope {
            write!(f, " (scope: {})", scope)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Which snapshot an element reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Existing,
    Future,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Existing => f.write_str("existing"),
            Side::Future => f.write_str("future"),
        }
    }
}

/// Error taxonomy for schemadiff operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDiffError {
    /// An element reference was empty or whitespace-only
    #[error("Invalid {side} reference: element reference cannot be empty")]
    EmptyReference { side: Side },

    /// The scope was empty or whitespace-only
    #[error("Invalid scope: scope cannot be empty")]
    EmptyScope,

    /// A schema document did not have the expected shape
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<SchemaDiffError> for ExError {
    fn from(err: SchemaDiffError) -> Self {
        match err {
            SchemaDiffError::EmptyReference { side } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("compare")
                .with_message(format!("{} reference cannot be empty", side)),

            SchemaDiffError::EmptyScope => ExError::new(ExErrorKind::InvalidInput)
                .with_op("compare")
                .with_message("Scope cannot be empty"),

            SchemaDiffError::InvalidDocument { reason } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(reason)
            }

            SchemaDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for SchemaDiffError {
    fn from(err: serde_json::Error) -> Self {
        SchemaDiffError::Serialization {
            message: err.to_string(),
        }
    }
}
