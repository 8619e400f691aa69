//! Environment configuration for the protection-sync CLI.
//!
//! The access token and the optional API base URL are read from the environment.
//! The governance settings file is loaded by `config_manager`.

use github_client::{create_token_client, GitHubClient};
use secrecy::SecretString;
use std::path::Path;
use tracing::debug;

use crate::errors::Error;
use config_manager::{load_governance_config, GovernanceConfig};

/// Environment variable holding the GitHub access token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Environment variable overriding the GitHub API base URL.
pub const API_URL_ENV_VAR: &str = "GITHUB_API_URL";

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "PROTECTION_SYNC_LOG";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// How to reach GitHub.
pub struct GitHubSettings {
    pub token: SecretString,
    pub api_url: Option<String>,
}

impl GitHubSettings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingCredential` if `GITHUB_TOKEN` is unset or empty.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::MissingCredential(format!(
                    "{} is not set; export a token with permission to administer the organization's repositories",
                    TOKEN_ENV_VAR
                ))
            })?;

        let api_url = lookup(API_URL_ENV_VAR)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        debug!(api_url = ?api_url, "Loaded GitHub settings from environment");

        Ok(Self {
            token: SecretString::from(token),
            api_url,
        })
    }

    /// Builds an authenticated client.
    pub fn create_client(&self) -> Result<GitHubClient, Error> {
        let octocrab = create_token_client(&self.token, self.api_url.as_deref())
            .map_err(|e| Error::Config(format!("Failed to create GitHub client: {}", e)))?;
        Ok(GitHubClient::new(octocrab))
    }
}

/// Loads and validates the governance settings file.
pub fn load_settings(path: &Path) -> Result<GovernanceConfig, Error> {
    debug!("Loading governance settings from {:?}", path);
    Ok(load_governance_config(path)?)
}
