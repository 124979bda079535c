//! Error types for intake.
//!
//! This module defines the crate-level error type returned by batch entry
//! points and query operations. Per-item failures are deliberately *not*
//! represented here: a failed read or transform is captured on the item
//! itself (`Item::error`, status `DoneFail`) and never aborts the batch.
//! See [`crate::transform::TransformError`] for the per-item taxonomy.
//!
//! # Error Handling Philosophy
//!
//! **Configuration errors are fatal and synchronous:**
//! - An empty status filter, or starting a batch while one is pending,
//!   fails immediately with `IntakeError::Configuration`.
//! - These are caller bugs and must never be swallowed.
//!
//! **Per-item errors never propagate:**
//! - Read and transform failures end the item in `DoneFail` with the
//!   failure message recorded; skip signals end it in `Skipped`.
//! - The batch future resolves once every item is terminal, regardless of
//!   how many items failed.
use thiserror::Error;

/// Result type alias using `IntakeError`.
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Main error type for batch-level intake operations.
///
/// # Variants
///
/// - `Configuration` - Invalid caller input, raised before any processing
/// - `Io` - I/O errors outside the per-item pipeline (always bubble up)
/// - `TaskPanic` - A worker task panicked; the batch cannot complete
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task panicked: {0}")]
    TaskPanic(String),
}

impl IntakeError {
    /// Create a `Configuration` error.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_message() {
        let err = IntakeError::configuration("missing file status");
        assert_eq!(err.to_string(), "Configuration error: missing file status");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IntakeError = io_err.into();
        assert!(matches!(err, IntakeError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_task_panic_error() {
        let err = IntakeError::TaskPanic("worker 3 panicked".to_string());
        assert_eq!(err.to_string(), "Worker task panicked: worker 3 panicked");
    }
}
