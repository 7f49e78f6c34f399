//! Convenience result type alias for Card Vault.

use crate::error::AppError;

/// A specialized `Result` type for Card Vault operations.
pub type AppResult<T> = Result<T, AppError>;
