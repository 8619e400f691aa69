//! Branch protection domain types.
//!
//! This module contains the two shapes GitHub uses for classic branch protection:
//! [`RemoteProtectionPayload`], the body accepted by
//! `PUT /repos/{owner}/{repo}/branches/{branch}/protection`, and [`BranchProtection`],
//! the richer document returned by the matching `GET`.
//!
//! See: https://docs.github.com/en/rest/branches/branch-protection

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Request body for updating the protection of a single branch.
///
/// GitHub requires the `required_status_checks`, `enforce_admins`,
/// `required_pull_request_reviews` and `restrictions` keys to be present on every
/// update, so those four serialize as `null` when unset. The remaining flags are
/// left out of the body entirely when unset and GitHub keeps its own default.
///
/// # Examples
///
/// ```rust
/// use github_client::{RemoteProtectionPayload, RequiredStatusChecks};
///
/// let payload = RemoteProtectionPayload {
///     required_status_checks: Some(RequiredStatusChecks {
///         strict: true,
///         contexts: vec!["ci/build".to_string()],
///     }),
///     enforce_admins: Some(true),
///     ..Default::default()
/// };
///
/// let body = serde_json::to_value(&payload).unwrap();
/// assert!(body["restrictions"].is_null());
/// assert!(body.get("lock_branch").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProtectionPayload {
    /// Status checks that must pass; `null` disables the requirement
    #[serde(default)]
    pub required_status_checks: Option<RequiredStatusChecks>,

    /// Enforce all configured restrictions for administrators
    #[serde(default)]
    pub enforce_admins: Option<bool>,

    /// Pull request review requirements; `null` disables them
    #[serde(default)]
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,

    /// Who may push; `null` means anyone with write access
    #[serde(default)]
    pub restrictions: Option<BranchRestrictions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_creations: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,

    /// Make the branch read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_branch: Option<bool>,

    /// Allow fork users to sync the branch while it is locked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_fork_syncing: Option<bool>,
}

/// Required status checks in the flat form the update endpoint accepts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredStatusChecks {
    /// Require branches to be up to date before merging
    pub strict: bool,

    /// Names of the checks that must pass, in configured order
    pub contexts: Vec<String>,
}

/// Pull request review requirements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPullRequestReviews {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_code_owner_reviews: Option<bool>,

    /// Number of approvals required, between 0 and 6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,

    /// Require the most recent push to be approved by someone other than the pusher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,
}

/// Allow-list of actors that may push to a protected branch.
///
/// An instance with all lists empty is a real setting (nobody may push) and is
/// different from having no restrictions at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRestrictions {
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

/// Branch protection as reported by GitHub.
///
/// Only the settings this crate writes are modelled; GitHub includes URLs and
/// other metadata which are ignored. Each toggle is wrapped in an
/// `{ "enabled": bool }` object on the read side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchProtection {
    #[serde(default)]
    pub required_status_checks: Option<StatusChecksState>,

    #[serde(default)]
    pub enforce_admins: Option<EnabledSetting>,

    #[serde(default)]
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,

    #[serde(default)]
    pub restrictions: Option<RestrictionsState>,

    #[serde(default)]
    pub required_linear_history: Option<EnabledSetting>,

    #[serde(default)]
    pub allow_force_pushes: Option<EnabledSetting>,

    #[serde(default)]
    pub allow_deletions: Option<EnabledSetting>,

    #[serde(default)]
    pub block_creations: Option<EnabledSetting>,

    #[serde(default)]
    pub required_conversation_resolution: Option<EnabledSetting>,

    #[serde(default)]
    pub lock_branch: Option<EnabledSetting>,

    #[serde(default)]
    pub allow_fork_syncing: Option<EnabledSetting>,
}

/// A boolean protection toggle as returned by the read endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnabledSetting {
    pub enabled: bool,
}

/// Status check requirements as returned by the read endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusChecksState {
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Push restrictions as returned by the read endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RestrictionsState {
    #[serde(default)]
    pub users: Vec<UserRef>,

    #[serde(default)]
    pub teams: Vec<SlugRef>,

    #[serde(default)]
    pub apps: Vec<SlugRef>,
}

/// A user entry inside [`RestrictionsState`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRef {
    pub login: String,
}

/// A team or app entry inside [`RestrictionsState`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlugRef {
    pub slug: String,
}

impl BranchProtection {
    /// Converts the read model into the update payload shape.
    ///
    /// This is what the branch would have to be sent to reproduce its current
    /// protection, which makes live state directly comparable with a payload
    /// computed from configuration.
    pub fn to_payload(&self) -> RemoteProtectionPayload {
        let enabled = |setting: &Option<EnabledSetting>| setting.map(|s| s.enabled);

        RemoteProtectionPayload {
            required_status_checks: self.required_status_checks.as_ref().map(|checks| {
                RequiredStatusChecks {
                    strict: checks.strict,
                    contexts: checks.contexts.clone(),
                }
            }),
            enforce_admins: enabled(&self.enforce_admins),
            required_pull_request_reviews: self.required_pull_request_reviews.clone(),
            restrictions: self
                .restrictions
                .as_ref()
                .map(|restrictions| BranchRestrictions {
                    users: restrictions.users.iter().map(|u| u.login.clone()).collect(),
                    teams: restrictions.teams.iter().map(|t| t.slug.clone()).collect(),
                    apps: restrictions.apps.iter().map(|a| a.slug.clone()).collect(),
                }),
            required_linear_history: enabled(&self.required_linear_history),
            allow_force_pushes: enabled(&self.allow_force_pushes),
            allow_deletions: enabled(&self.allow_deletions),
            block_creations: enabled(&self.block_creations),
            required_conversation_resolution: enabled(&self.required_conversation_resolution),
            lock_branch: enabled(&self.lock_branch),
            allow_fork_syncing: enabled(&self.allow_fork_syncing),
        }
    }
}
