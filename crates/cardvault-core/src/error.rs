//! Unified application error types for Card Vault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource, share, or transaction was not found.
    NotFound,
    /// The user a share should be granted to does not exist.
    UserNotFound,
    /// The caller is authenticated but not allowed to perform the action.
    AccessDenied,
    /// Input validation failed.
    Validation,
    /// A uniqueness rule was violated (duplicate share, duplicate email, ...).
    Conflict,
    /// A transaction amount was zero, negative, or not representable in cents.
    InvalidAmount,
    /// The gift card does not hold enough balance for the requested debit.
    InsufficientBalance,
    /// The storage layer rejected a write that would make a gift card
    /// balance negative. Never leaves the ledger; remapped to
    /// [`ErrorKind::InsufficientBalance`].
    BalanceConstraint,
    /// The operation was cancelled before it completed.
    Cancelled,
    /// An opaque storage failure.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::AccessDenied => write!(f, "ACCESS_DENIED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::InvalidAmount => write!(f, "INVALID_AMOUNT"),
            Self::InsufficientBalance => write!(f, "INSUFFICIENT_BALANCE"),
            Self::BalanceConstraint => write!(f, "BALANCE_CONSTRAINT"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Card Vault.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a share-recipient-not-found error.
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserNotFound, message)
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an invalid-amount error.
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAmount, message)
    }

    /// Create an insufficient-balance error reporting what is still available.
    ///
    /// `available` is rendered as given; callers format money with two
    /// decimal places.
    pub fn insufficient_balance(available: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InsufficientBalance,
            format!("Insufficient balance: only {available} available"),
        )
    }

    /// Create a cancellation error.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is one of the two outcomes an unauthorized caller
    /// must not be able to tell apart.
    pub fn is_access_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound | ErrorKind::AccessDenied)
    }

    /// Fold `NotFound` and `AccessDenied` into one outward error so a caller
    /// cannot probe for resources it is not allowed to see.
    ///
    /// Every other error is returned unchanged.
    pub fn conceal(self) -> Self {
        if self.is_access_failure() {
            Self::not_found("Resource not found")
        } else {
            self
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
