use config_manager::ConfigurationError;
use protection_sync_core::ReconcileError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Process exit code for errors that stop a command before it completes.
pub const FATAL_EXIT_CODE: i32 = 2;

/// Errors that can occur in the protection-sync CLI application.
///
/// Every variant is fatal to the command that raised it. Per-branch failures during
/// a sync are not errors; they are part of the run report.
#[derive(Error, Debug)]
pub enum Error {
    /// The access token is not available.
    ///
    /// Raised at startup, before any remote call is made.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Configuration error occurred while loading or validating the settings file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The repository listing could not be completed.
    #[error("Reconciliation aborted: {0}")]
    Reconciliation(String),

    /// A remote call made directly by a command failed.
    #[error("GitHub error: {0}")]
    Remote(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The report could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<ReconcileError> for Error {
    fn from(e: ReconcileError) -> Self {
        Error::Reconciliation(e.to_string())
    }
}

impl From<github_client::Error> for Error {
    fn from(e: github_client::Error) -> Self {
        Error::Remote(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Output(e.to_string())
    }
}
