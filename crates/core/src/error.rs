//! Error handling for the Cinelog core library

use thiserror::Error;

/// Result type alias for Cinelog operations
pub type Result<T> = std::result::Result<T, CinelogError>;

/// Main error type for Cinelog operations
#[derive(Error, Debug)]
pub enum CinelogError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A log or catalog store could not be reached
    #[error("{store} store unavailable: {message}")]
    StoreUnavailable { store: String, message: String },

    /// The log store refused an append
    #[error("Write rejected: {message}")]
    WriteRejected { message: String },

    /// Caller supplied parameters that cannot be normalized
    #[error("Malformed event: {message}")]
    MalformedEvent { message: String },

    /// A store was reachable but the query itself failed
    #[error("Query failed: {message}")]
    QueryFailed { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
}

impl CinelogError {
    /// Create a store unavailable error
    pub fn store_unavailable<S1: Into<String>, S2: Into<String>>(store: S1, message: S2) -> Self {
        Self::StoreUnavailable {
            store: store.into(),
            message: message.into(),
        }
    }

    /// Create a write rejected error
    pub fn write_rejected<S: Into<String>>(message: S) -> Self {
        Self::WriteRejected {
            message: message.into(),
        }
    }

    /// Create a malformed event error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedEvent {
            message: message.into(),
        }
    }

    /// Create a query failed error
    pub fn query_failed<S: Into<String>>(message: S) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// True when the failure means a store could not be reached at all
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// True for failures on the write path that the recorder tolerates
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::WriteRejected { .. }
        )
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) | Self::Yaml(_) => "serialization",
            Self::Config(_) => "config",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::WriteRejected { .. } => "write_rejected",
            Self::MalformedEvent { .. } => "malformed_event",
            Self::QueryFailed { .. } => "query",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
        }
    }
}
