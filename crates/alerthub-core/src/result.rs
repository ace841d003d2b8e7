//! Convenience result type alias for AlertHub.

use crate::error::AppError;

/// A specialized `Result` type for AlertHub operations.
pub type AppResult<T> = Result<T, AppError>;
