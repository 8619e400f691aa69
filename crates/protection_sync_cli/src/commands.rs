//! Command modules for the protection-sync CLI.
//!
//! - `sync_cmd`: reconcile branch protection across an organization
//! - `validate_cmd`: check a settings file offline and preview what it resolves to
//! - `show_cmd`: print the live protection of one branch

use crate::errors::Error;

pub mod show_cmd;
pub mod sync_cmd;
pub mod validate_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, coloured when the terminal supports it
    Pretty,

    /// Machine-readable JSON
    Json,
}

impl OutputFormat {
    /// Parses the `--format` argument.
    pub fn parse(format: &str) -> Result<Self, Error> {
        match format {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::InvalidArguments(format!(
                "Invalid format: '{}'. Use 'json' or 'pretty'.",
                format
            ))),
        }
    }
}
