//! Error types for codingops.

use thiserror::Error;

/// Main error type for codingops operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// Remote rejected the credential (HTTP 401). Carries the raw body.
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    /// Remote resource does not exist (HTTP 404). Carries the raw body.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or blank required setting
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied a missing, malformed or out-of-range argument
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unknown tool name
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// A connection was requested before any configuration was installed
    #[error("Connection must be initialized with a configuration before use")]
    NotInitialized,

    /// Unclassified failure, wrapped once with the original message
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// Whether this error already belongs to a caller-facing category and
    /// must reach the caller unchanged.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Error::InvalidParams(_)
                | Error::MethodNotFound(_)
                | Error::NotFound(_)
                | Error::Unauthorized(_)
        )
    }

    /// HTTP status code associated with the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Unauthorized(_) => Some(401),
            Error::NotFound(_) => Some(404),
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Http(_) => "http",
            Error::Unauthorized(_) => "authentication",
            Error::NotFound(_) => "not_found",
            Error::Api { .. } => "api",
            Error::InvalidData(_) => "invalid_data",
            Error::Serialization(_) => "serialization",
            Error::Config(_) => "configuration",
            Error::InvalidParams(_) => "invalid_params",
            Error::MethodNotFound(_) => "method_not_found",
            Error::NotInitialized => "not_initialized",
            Error::Internal(_) => "internal",
            Error::Other(_) => "other",
        }
    }
}

/// Result type alias for codingops operations.
pub type Result<T> = std::result::Result<T, Error>;
