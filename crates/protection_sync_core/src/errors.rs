use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that abort a reconciliation run.
///
/// Per-branch failures are never errors; they are recorded as
/// [`crate::OutcomeStatus::Failed`] and the run continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Listing the organization's repositories failed. A partial listing is not
    /// reconciled.
    #[error("Failed to enumerate repositories for organization '{org}': {reason}")]
    EnumerationFailure { org: String, reason: String },
}

/// Result type alias for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
