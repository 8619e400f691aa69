//! Configuration system error types.
//!
//! Domain-specific errors for loading, parsing and validating the
//! governance settings file.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration system errors.
///
/// Every variant is fatal for a reconciliation run: the settings file is
/// rejected before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to access configuration file: {path} - {reason}")]
    FileAccessError { path: String, reason: String },

    #[error("Failed to parse configuration: {reason}")]
    ParseError { reason: String },

    #[error("Unsupported configuration format for file: {path}. Expected .yaml, .yml or .toml")]
    UnsupportedFormat { path: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Repository '{name}' has more than one override entry")]
    DuplicateRepositoryOverride { name: String },
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
