//! Branch protection settings.
//!
//! Describes the protection rules a branch should carry. Every setting is optional:
//! a setting left out of the configuration is `None`, which is different from a
//! setting explicitly turned off. The remote API treats the two differently for
//! some settings (most visibly push restrictions).

use serde::{Deserialize, Serialize};

/// Protection rules for a single branch.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::{ProtectionPolicy, PullRequestReviewPolicy};
///
/// let policy = ProtectionPolicy {
///     required_pull_request_reviews: Some(PullRequestReviewPolicy {
///         required_approving_review_count: Some(2),
///         ..Default::default()
///     }),
///     enforce_admins: Some(true),
///     ..Default::default()
/// };
/// assert!(policy.restrictions.is_none());
/// ```
///
/// # YAML Format
///
/// ```yaml
/// required_pull_request_reviews:
///   required_approving_review_count: 2
///   dismiss_stale_reviews: true
/// required_status_checks:
///   strict: true
///   checks:
///     - context: ci/build
///     - context: ci/test
///       app_id: 15368
/// enforce_admins: true
/// restrictions: null
/// allow_force_pushes: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProtectionPolicy {
    /// Pull request review requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_pull_request_reviews: Option<PullRequestReviewPolicy>,

    /// Status checks that must pass before merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_status_checks: Option<StatusCheckPolicy>,

    /// Apply the rules to repository administrators too
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_admins: Option<bool>,

    /// Restrict who can push; absent means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<PushRestrictions>,

    /// Require a linear history (no merge commits)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,

    /// Allow force pushes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,

    /// Allow deletions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,

    /// Block creation of matching branches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_creations: Option<bool>,

    /// Require all review conversations to be resolved before merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,

    /// Make the branch read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_branch: Option<bool>,

    /// Allow fork users to sync a locked branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_fork_syncing: Option<bool>,
}

/// Pull request review requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PullRequestReviewPolicy {
    /// Required number of approving reviews (0 to 6)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,

    /// Dismiss stale reviews when new commits are pushed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,

    /// Require review from code owners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_code_owner_reviews: Option<bool>,

    /// Require approval of the most recent push by someone other than the pusher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,
}

/// Required status check settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StatusCheckPolicy {
    /// Require branches to be up to date before merging
    #[serde(default)]
    pub strict: bool,

    /// Checks that must pass, in order
    #[serde(default)]
    pub checks: Vec<StatusCheck>,
}

/// A single required status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusCheck {
    /// Name of the check as reported to GitHub
    pub context: String,

    /// The GitHub App expected to report the check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
}

impl StatusCheck {
    /// Creates a check that any app may report.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            app_id: None,
        }
    }
}

/// Named allow-list of actors that may push to a protected branch.
///
/// Present with empty lists means nobody may push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PushRestrictions {
    /// User logins
    #[serde(default)]
    pub users: Vec<String>,

    /// Team slugs
    #[serde(default)]
    pub teams: Vec<String>,

    /// GitHub App slugs
    #[serde(default)]
    pub apps: Vec<String>,
}

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;
