use thiserror::Error;

/// Result type alias using GateError
pub type Result<T> = std::result::Result<T, GateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log assertions and external reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Construction
    InvalidPath,
    MissingLogger,
    InvalidLogger,
    InvalidCallback,
    UnknownReference,
    InvalidConfig,

    // Resolution
    NotAMapping,
    TransformFailed,
    FilterFailed,

    // Source
    SourceUnavailable,
    SubscriptionClosed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::MissingLogger => "ERR_MISSING_LOGGER",
            ExErrorKind::InvalidLogger => "ERR_INVALID_LOGGER",
            ExErrorKind::InvalidCallback => "ERR_INVALID_CALLBACK",
            ExErrorKind::UnknownReference => "ERR_UNKNOWN_REFERENCE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotAMapping => "ERR_NOT_A_MAPPING",
            ExErrorKind::TransformFailed => "ERR_TRANSFORM_FAILED",
            ExErrorKind::FilterFailed => "ERR_FILTER_FAILED",
            ExErrorKind::SourceUnavailable => "ERR_SOURCE_UNAVAILABLE",
            ExErrorKind::SubscriptionClosed => "ERR_SUBSCRIPTION_CLOSED",
        }
    }

    /// True for errors raised while building an instance
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidPath
                | ExErrorKind::MissingLogger
                | ExErrorKind::InvalidLogger
                | ExErrorKind::InvalidCallback
                | ExErrorKind::UnknownReference
                | ExErrorKind::InvalidConfig
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling and the context
/// (operation, gate key, source path) needed to debug a failed reload.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    gate_key: Option<String>,
    source_path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            gate_key: None,
            source_path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add gate key context
    pub fn with_gate_key(mut self, key: impl Into<String>) -> Self {
        self.gate_key = Some(key.into());
        self
    }

    /// Add source path context
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
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

    pub fn gate_key(&self) -> Option<&str> {
        self.gate_key.as_deref()
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
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
        if let Some(key) = &self.gate_key {
            write!(f, " (gate_key: {})", key)?;
        }
        if let Some(path) = &self.source_path {
            write!(f, " (source_path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for gate construction, resolution and reloading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    // ===== Configuration Errors =====
    /// A push source was configured without a usable document path
    #[error("Invalid string provided as \"path\": {reason}")]
    InvalidPath { reason: String },

    /// Reload logging was enabled but no logger was supplied
    #[error("\"logger\" should be provided if \"log_on_reload\" needs to be enabled")]
    MissingLogger,

    /// A logger was named that cannot receive `info` records
    #[error("\"logger\" should name a sink with an \"info\" capability, got {name:?}")]
    InvalidLogger { name: String },

    /// An on-loaded hook was named that is not invokable
    #[error("\"on_loaded\" should name a registered callback, got {name:?}")]
    InvalidCallback { name: String },

    /// A translate rule referenced a transformer that is not registered
    #[error("Unknown transformer {name:?} for gate {key}")]
    UnknownTransformer { key: String, name: String },

    /// A filter entry referenced a filter that is not registered
    #[error("Unknown filter {name:?} for gate {key}")]
    UnknownFilter { key: String, name: String },

    /// Declarative configuration could not be read or parsed
    #[error("Invalid gates configuration: {message}")]
    Config { message: String },

    // ===== Resolution Errors =====
    /// Gates document was neither a mapping nor null
    #[error("Gates must be a mapping, got {found}")]
    NotAMapping { found: String },

    /// A transformer returned an error
    #[error("Transformer for gate {key} failed: {message}")]
    Transform { key: String, message: String },

    /// A filter function returned an error
    #[error("Filter for gate {key} failed: {message}")]
    Filter { key: String, message: String },

    // ===== Source Errors =====
    /// The document source failed to deliver or fetch a document
    #[error("Document source failed for {path}: {message}")]
    Source { path: String, message: String },

    /// The subscription ended before the first document arrived
    #[error("Subscription to {path} closed before the first update")]
    SubscriptionClosed { path: String },
}

impl GateError {
    /// Classification of this error in the canonical taxonomy
    pub fn kind(&self) -> ExErrorKind {
        match self {
            GateError::InvalidPath { .. } => ExErrorKind::InvalidPath,
            GateError::MissingLogger => ExErrorKind::MissingLogger,
            GateError::InvalidLogger { .. } => ExErrorKind::InvalidLogger,
            GateError::InvalidCallback { .. } => ExErrorKind::InvalidCallback,
            GateError::UnknownTransformer { .. } | GateError::UnknownFilter { .. } => {
                ExErrorKind::UnknownReference
            }
            GateError::Config { .. } => ExErrorKind::InvalidConfig,
            GateError::NotAMapping { .. } => ExErrorKind::NotAMapping,
            GateError::Transform { .. } => ExErrorKind::TransformFailed,
            GateError::Filter { .. } => ExErrorKind::FilterFailed,
            GateError::Source { .. } => ExErrorKind::SourceUnavailable,
            GateError::SubscriptionClosed { .. } => ExErrorKind::SubscriptionClosed,
        }
    }
}

impl From<&GateError> for ExError {
    fn from(err: &GateError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            GateError::UnknownTransformer { key, .. }
            | GateError::UnknownFilter { key, .. }
            | GateError::Transform { key, .. }
            | GateError::Filter { key, .. } => ex.with_gate_key(key),
            GateError::Source { path, .. } | GateError::SubscriptionClosed { path } => {
                ex.with_source_path(path)
            }
            _ => ex,
        }
    }
}

impl From<GateError> for ExError {
    fn from(err: GateError) -> Self {
        ExError::from(&err)
    }
}
