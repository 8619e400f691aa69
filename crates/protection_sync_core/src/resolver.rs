//! Decides which branch protection applies to a repository.

use config_manager::{BranchPolicyMap, BranchSettingsMap, GovernanceConfig};
use tracing::{debug, warn};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Resolves the branch policies that govern a repository.
///
/// A repository with an override entry gets exactly the override's branches; the
/// organization defaults are not merged in. Every other repository gets the
/// organization defaults. Branch entries without protection are dropped.
///
/// An empty map means there is nothing to do for the repository.
///
/// # Examples
///
/// ```rust
/// use config_manager::{BranchSettings, GovernanceConfig, ProtectionPolicy};
/// use protection_sync_core::resolve;
///
/// let mut config = GovernanceConfig::default();
/// config.branches.insert(
///     "main".to_string(),
///     BranchSettings::protected(ProtectionPolicy::default()),
/// );
///
/// let resolved = resolve(&config, "any-repo");
/// assert!(resolved.contains_key("main"));
/// ```
pub fn resolve(config: &GovernanceConfig, repository: &str) -> BranchPolicyMap {
    match config.find_override(repository) {
        Some(repo_override) => {
            debug!(
                repo = repository,
                branches = repo_override.branches.len(),
                "Using repository override"
            );
            protected_branches(repository, &repo_override.branches)
        }
        None => {
            debug!(
                repo = repository,
                branches = config.branches.len(),
                "Using organization defaults"
            );
            protected_branches(repository, &config.branches)
        }
    }
}

/// Resolves the organization-wide branch policies, ignoring every override.
pub fn resolve_default(config: &GovernanceConfig) -> BranchPolicyMap {
    protected_branches("*", &config.branches)
}

fn protected_branches(repository: &str, branches: &BranchSettingsMap) -> BranchPolicyMap {
    branches
        .iter()
        .filter_map(|(branch, settings)| match &settings.protection {
            Some(policy) => Some((branch.clone(), policy.clone())),
            None => {
                warn!(
                    repo = repository,
                    branch = branch.as_str(),
                    "Branch entry has no protection settings, skipping"
                );
                None
            }
        })
        .collect()
}
