//! Settings file loading.
//!
//! Reads the governance settings file from disk, parses it as YAML or TOML
//! depending on its extension, and validates the result.

use std::{fs, path::Path};
use tracing::{debug, info};

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::governance::GovernanceConfig;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Supported settings file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for anything other than `.yaml`, `.yml` or `.toml`.
    pub fn from_path(path: &Path) -> ConfigurationResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigurationError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Parses and validates settings file content.
///
/// # Errors
///
/// Returns `ParseError` if the content does not match the settings schema, or any
/// error produced by [`GovernanceConfig::validate`].
///
/// # Example
///
/// ```rust
/// use config_manager::{parse_governance_config, ConfigFormat};
///
/// let config = parse_governance_config(
///     "branches:\n  main:\n    protection:\n      enforce_admins: true\n",
///     ConfigFormat::Yaml,
/// )
/// .unwrap();
/// assert!(config.branches.contains_key("main"));
/// ```
pub fn parse_governance_config(
    content: &str,
    format: ConfigFormat,
) -> ConfigurationResult<GovernanceConfig> {
    let config: GovernanceConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            ConfigurationError::ParseError {
                reason: format!("Invalid YAML: {}", e),
            }
        })?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigurationError::ParseError {
                reason: format!("Invalid TOML: {}", e),
            })?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Loads the governance settings file at `path`.
///
/// # Errors
///
/// - `FileNotFound` if nothing exists at `path`
/// - `UnsupportedFormat` if the extension is not recognised
/// - `FileAccessError` if the file cannot be read
/// - any error from [`parse_governance_config`]
pub fn load_governance_config(path: &Path) -> ConfigurationResult<GovernanceConfig> {
    debug!("Loading governance configuration from {:?}", path);

    if !path.exists() {
        return Err(ConfigurationError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let format = ConfigFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| ConfigurationError::FileAccessError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let config = parse_governance_config(&content, format)?;

    info!(
        path = %path.display(),
        default_branches = config.branches.len(),
        overrides = config.repositories.len(),
        "Loaded governance configuration"
    );

    Ok(config)
}
