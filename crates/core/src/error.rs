//! Unified error types for the ingestion service.
//!
//! Error codes:
//! - VALID_001-003: Validation errors
//! - DB_001: Event store errors
//! - UPSTREAM_001: External fetch agent unreachable

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Invalid JSON / shape mismatch
    InvalidFormat,
    /// VALID_002: Field value out of range
    OutOfRange,
    /// VALID_003: External record claims a synthetic origin
    ReservedOrigin,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "VALID_001",
            Self::OutOfRange => "VALID_002",
            Self::ReservedOrigin => "VALID_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        400
    }
}

/// Database error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// DB_001: Store operation failed
    StoreFailed,
}

impl DbErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreFailed => "DB_001",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        500
    }
}

/// Upstream collaborator error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorCode {
    /// UPSTREAM_001: Fetch agent unreachable
    Unavailable,
}

impl UpstreamErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "UPSTREAM_001",
        }
    }

    pub fn http_status(&self) -> u16 {
        503
    }
}

/// Unified error type for the ingestion service.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error with code.
    #[error("[{code}] {message}")]
    ValidationWithCode {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Database error with code.
    #[error("[{code}] {message}")]
    Database {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Upstream collaborator error with code.
    #[error("[{code}] {message}")]
    Upstream {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error with code.
    pub fn validation_code(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::ValidationWithCode {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Shorthand for an out-of-range field.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::validation_code(ValidationErrorCode::OutOfRange, msg)
    }

    /// Create a database error.
    pub fn database(code: DbErrorCode, msg: impl Into<String>) -> Self {
        Self::Database {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a store failure (`DB_001`).
    pub fn store(msg: impl Into<String>) -> Self {
        Self::database(DbErrorCode::StoreFailed, msg)
    }

    /// Create an upstream collaborator error.
    pub fn upstream(code: UpstreamErrorCode, msg: impl Into<String>) -> Self {
        Self::Upstream {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationWithCode { http_status, .. } => *http_status,
            Self::Database { http_status, .. } => *http_status,
            Self::Upstream { http_status, .. } => *http_status,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::ValidationWithCode { code, .. } => Some(code),
            Self::Database { code, .. } => Some(code),
            Self::Upstream { code, .. } => Some(code),
            _ => None,
        }
    }
}
