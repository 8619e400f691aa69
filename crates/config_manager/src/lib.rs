//! Configuration management for protection_sync
//!
//! This crate owns the governance settings model: organization-wide branch
//! protection defaults, per-repository overrides, the protection policy of a single
//! branch, and the loader that reads all of it from a YAML or TOML file.

pub mod errors;
pub mod governance;
pub mod loader;
pub mod settings;

// Re-export for convenient access
pub use errors::{ConfigurationError, ConfigurationResult};
pub use governance::{
    BranchPolicyMap, BranchSettings, BranchSettingsMap, GovernanceConfig, RepositoryOverride,
    MAX_REQUIRED_APPROVING_REVIEWS,
};
pub use loader::{load_governance_config, parse_governance_config, ConfigFormat};
pub use settings::{
    ProtectionPolicy, PullRequestReviewPolicy, PushRestrictions, StatusCheck, StatusCheckPolicy,
};
