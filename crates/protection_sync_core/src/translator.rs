//! Converts configured protection into the body of the set-protection call.

use config_manager::{
    ProtectionPolicy, PullRequestReviewPolicy, PushRestrictions, StatusCheckPolicy,
};
use github_client::{
    BranchRestrictions, RemoteProtectionPayload, RequiredPullRequestReviews, RequiredStatusChecks,
};

#[cfg(test)]
#[path = "translator_tests.rs"]
mod tests;

/// Translates a protection policy into the remote payload.
///
/// Status checks become `{strict, contexts}` with the contexts in configured order,
/// duplicates kept and app ids dropped. A policy without status checks, or with an
/// empty check list, produces `null` so the remote disables the requirement instead
/// of requiring zero checks. Every other setting is copied as is.
pub fn translate(policy: &ProtectionPolicy) -> RemoteProtectionPayload {
    RemoteProtectionPayload {
        required_status_checks: policy
            .required_status_checks
            .as_ref()
            .and_then(translate_status_checks),
        enforce_admins: policy.enforce_admins,
        required_pull_request_reviews: policy
            .required_pull_request_reviews
            .as_ref()
            .map(translate_reviews),
        restrictions: policy.restrictions.as_ref().map(translate_restrictions),
        required_linear_history: policy.required_linear_history,
        allow_force_pushes: policy.allow_force_pushes,
        allow_deletions: policy.allow_deletions,
        block_creations: policy.block_creations,
        required_conversation_resolution: policy.required_conversation_resolution,
        lock_branch: policy.lock_branch,
        allow_fork_syncing: policy.allow_fork_syncing,
    }
}

fn translate_status_checks(checks: &StatusCheckPolicy) -> Option<RequiredStatusChecks> {
    if checks.checks.is_empty() {
        return None;
    }

    Some(RequiredStatusChecks {
        strict: checks.strict,
        contexts: checks.checks.iter().map(|c| c.context.clone()).collect(),
    })
}

fn translate_reviews(reviews: &PullRequestReviewPolicy) -> RequiredPullRequestReviews {
    RequiredPullRequestReviews {
        dismiss_stale_reviews: reviews.dismiss_stale_reviews,
        require_code_owner_reviews: reviews.require_code_owner_reviews,
        required_approving_review_count: reviews.required_approving_review_count,
        require_last_push_approval: reviews.require_last_push_approval,
    }
}

fn translate_restrictions(restrictions: &PushRestrictions) -> BranchRestrictions {
    BranchRestrictions {
        users: restrictions.users.clone(),
        teams: restrictions.teams.clone(),
        apps: restrictions.apps.clone(),
    }
}
