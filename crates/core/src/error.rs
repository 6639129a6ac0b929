//! External error taxonomy and response normalizer.
//!
//! Every failure the core surfaces to route handlers carries a stable
//! machine-readable kind plus a human message, decoupled so callers can
//! branch on kind. Internal detail (stack traces, store errors, hashing
//! faults) is never forwarded verbatim.

use serde_json::json;
use thiserror::Error;

/// Result type used across the auth core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Boundary-level error.
///
/// Keep this focused on deterministic, caller-observable failures. Layers
/// below (store, tokens, hashing) have their own error enums and are mapped
/// into this taxonomy at the session boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed input (missing fields, mismatched confirmation, short password).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation (login key already registered).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Login key/password pair does not resolve.
    ///
    /// The message is fixed and never disambiguates unknown-account from
    /// wrong-password (account enumeration).
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired, or revoked token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated but lacking role/permission/ownership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource absent, or invisible to the caller (same report by policy).
    #[error("not found")]
    NotFound,

    /// Transient storage failure; retryable by the caller.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Unexpected internal fault (hashing/signing). Not retryable input.
    #[error("internal error")]
    Internal(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable kind for branching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::ValidationFailed,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Normalized wire body: `{"error": <kind>, "message": <human text>}`.
    ///
    /// `Internal` deliberately hides its payload; the detail stays in logs.
    pub fn to_body(&self) -> serde_json::Value {
        let message = match self {
            AuthError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        json!({
            "error": self.kind().as_str(),
            "message": message,
        })
    }
}

/// Machine-readable error kind with its conventional HTTP status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationFailed,
    Conflict,
    InvalidCredentials,
    Unauthenticated,
    Forbidden,
    NotFound,
    StoreUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidCredentials => "invalid_credentials",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::Internal => "internal",
        }
    }

    /// Conventional HTTP status for transports that want one.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::ValidationFailed => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::InvalidCredentials => 401,
            ErrorKind::Unauthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::StoreUnavailable => 503,
            ErrorKind::Internal => 500,
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
