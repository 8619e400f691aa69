//! Governance configuration model.
//!
//! The root document of the settings file: organization-wide branch protection
//! defaults plus optional per-repository overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::settings::ProtectionPolicy;

#[cfg(test)]
#[path = "governance_tests.rs"]
mod tests;

/// Highest approving review count GitHub accepts.
pub const MAX_REQUIRED_APPROVING_REVIEWS: u32 = 6;

/// Resolved branch protection: branch name to the policy that applies to it.
///
/// Ordered by branch name, which is the order branches are processed in.
pub type BranchPolicyMap = BTreeMap<String, ProtectionPolicy>;

/// Branch entries as written in the settings file.
pub type BranchSettingsMap = BTreeMap<String, BranchSettings>;

/// Settings for one branch.
///
/// # YAML Format
///
/// ```yaml
/// main:
///   protection:
///     enforce_admins: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BranchSettings {
    /// Protection rules; an entry without them has nothing to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<ProtectionPolicy>,
}

impl BranchSettings {
    /// Creates branch settings carrying the given protection.
    pub fn protected(policy: ProtectionPolicy) -> Self {
        Self {
            protection: Some(policy),
        }
    }
}

/// Branch settings for one repository that replace the organization defaults.
///
/// The replacement is total: branches defined only in the organization defaults
/// are not applied to a repository that has an override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryOverride {
    /// Repository name, without the owner
    pub name: String,

    /// Branch settings for this repository
    #[serde(default)]
    pub branches: BranchSettingsMap,
}

/// Root of the governance settings file.
///
/// # YAML Format
///
/// ```yaml
/// branches:
///   main:
///     protection:
///       required_pull_request_reviews:
///         required_approving_review_count: 2
/// repositories:
///   - name: payments-api
///     branches:
///       main:
///         protection:
///           required_pull_request_reviews:
///             required_approving_review_count: 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GovernanceConfig {
    /// Organization-wide branch settings
    #[serde(default)]
    pub branches: BranchSettingsMap,

    /// Per-repository replacements of the organization-wide settings
    #[serde(default)]
    pub repositories: Vec<RepositoryOverride>,
}

impl GovernanceConfig {
    /// Returns the override entry for a repository, if there is one.
    ///
    /// Names are compared exactly. When the configuration holds duplicate entries
    /// (which [`GovernanceConfig::validate`] rejects) the first one wins.
    pub fn find_override(&self, repository: &str) -> Option<&RepositoryOverride> {
        self.repositories.iter().find(|o| o.name == repository)
    }

    /// Checks the configuration for problems the type system cannot express.
    ///
    /// # Errors
    ///
    /// - `DuplicateRepositoryOverride` if two override entries name the same repository
    /// - `InvalidConfiguration` for empty repository or branch names, empty status
    ///   check names, or a review count above [`MAX_REQUIRED_APPROVING_REVIEWS`]
    pub fn validate(&self) -> ConfigurationResult<()> {
        validate_branches("branches", &self.branches)?;

        let mut seen = HashSet::new();
        for (index, repo_override) in self.repositories.iter().enumerate() {
            if repo_override.name.trim().is_empty() {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: format!("repositories[{}].name", index),
                    reason: "repository name must not be empty".to_string(),
                });
            }

            if !seen.insert(repo_override.name.as_str()) {
                return Err(ConfigurationError::DuplicateRepositoryOverride {
                    name: repo_override.name.clone(),
                });
            }

            validate_branches(
                &format!("repositories[{}].branches", index),
                &repo_override.branches,
            )?;
        }

        debug!(
            default_branches = self.branches.len(),
            overrides = self.repositories.len(),
            "Governance configuration validated"
        );

        Ok(())
    }
}

fn validate_branches(field: &str, branches: &BranchSettingsMap) -> ConfigurationResult<()> {
    for (branch, settings) in branches {
        if branch.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                field: field.to_string(),
                reason: "branch name must not be empty".to_string(),
            });
        }

        let Some(policy) = &settings.protection else {
            continue;
        };

        if let Some(count) = policy
            .required_pull_request_reviews
            .as_ref()
            .and_then(|r| r.required_approving_review_count)
        {
            if count > MAX_REQUIRED_APPROVING_REVIEWS {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: format!(
                        "{}.{}.protection.required_pull_request_reviews.required_approving_review_count",
                        field, branch
                    ),
                    reason: format!(
                        "must be between 0 and {}, got {}",
                        MAX_REQUIRED_APPROVING_REVIEWS, count
                    ),
                });
            }
        }

        if let Some(checks) = &policy.required_status_checks {
            if checks.checks.iter().any(|c| c.context.trim().is_empty()) {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: format!("{}.{}.protection.required_status_checks", field, branch),
                    reason: "status check context must not be empty".to_string(),
                });
            }
        }
    }

    Ok(())
}
