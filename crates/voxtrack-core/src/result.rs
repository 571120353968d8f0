//! Convenience result type alias for voxtrack.

use crate::error::AppError;

/// A specialized `Result` type for voxtrack operations.
pub type AppResult<T> = Result<T, AppError>;
